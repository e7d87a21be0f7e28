//! JSON rendering for outline results.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{Error, Result};
use crate::model::OutlineResult;

/// Indentation of pretty output, four spaces per level.
const PRETTY_INDENT: &[u8] = b"    ";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON, indented by four spaces
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline result to JSON.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json(result: &OutlineResult, format: JsonFormat) -> Result<String> {
    match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            result.serialize(&mut ser)?;
            String::from_utf8(buf).map_err(|e| Error::Render(e.to_string()))
        }
        JsonFormat::Compact => Ok(serde_json::to_string(result)?),
    }
}

/// Parse an outline result back from JSON.
pub fn from_json(json: &str) -> Result<OutlineResult> {
    Ok(serde_json::from_str(json)?)
}
