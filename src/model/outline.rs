//! Outline types: heading levels, headings and the final result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A heading level, rendered as "H1", "H2", ...
///
/// Numbered headings stop at H4; size tiers can go deeper when a document
/// uses many distinct heading sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HeadingLevel(u32);

impl HeadingLevel {
    pub const H1: HeadingLevel = HeadingLevel(1);
    pub const H2: HeadingLevel = HeadingLevel(2);
    pub const H3: HeadingLevel = HeadingLevel(3);
    pub const H4: HeadingLevel = HeadingLevel(4);

    /// Create a level from its depth. Depth 0 is clamped to 1.
    pub fn new(depth: u32) -> Self {
        Self(depth.max(1))
    }

    /// Nesting depth (1 for H1).
    pub fn depth(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl From<HeadingLevel> for String {
    fn from(level: HeadingLevel) -> Self {
        level.to_string()
    }
}

impl TryFrom<String> for HeadingLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .strip_prefix('H')
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(HeadingLevel)
            .ok_or_else(|| format!("invalid heading level: {:?}", value))
    }
}

/// A detected heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The inferred structure of one document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Detected title (may be empty)
    pub title: String,
    /// Headings ordered by page, then vertical position
    pub outline: Vec<Heading>,
}

impl OutlineResult {
    /// Create a new result.
    pub fn new(title: impl Into<String>, outline: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Check if no headings were detected.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Headings on a given page.
    pub fn headings_on_page(&self, page: u32) -> impl Iterator<Item = &Heading> {
        self.outline.iter().filter(move |h| h.page == page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_display() {
        assert_eq!(HeadingLevel::H1.to_string(), "H1");
        assert_eq!(HeadingLevel::new(7).to_string(), "H7");
        assert_eq!(HeadingLevel::new(0), HeadingLevel::H1);
    }

    #[test]
    fn test_heading_level_parse() {
        assert_eq!(
            HeadingLevel::try_from("H3".to_string()),
            Ok(HeadingLevel::H3)
        );
        assert!(HeadingLevel::try_from("H0".to_string()).is_err());
        assert!(HeadingLevel::try_from("h2".to_string()).is_err());
        assert!(HeadingLevel::try_from("Heading".to_string()).is_err());
    }

    #[test]
    fn test_outline_serialization_shape() {
        let result = OutlineResult::new(
            "Request for Proposal: Digital Library",
            vec![Heading::new(HeadingLevel::H2, "1.1 Background", 3)],
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Request for Proposal: Digital Library",
                "outline": [{"level": "H2", "text": "1.1 Background", "page": 3}]
            })
        );

        let back: OutlineResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_headings_on_page() {
        let result = OutlineResult::new(
            "",
            vec![
                Heading::new(HeadingLevel::H1, "A", 1),
                Heading::new(HeadingLevel::H1, "B", 2),
                Heading::new(HeadingLevel::H2, "C", 2),
            ],
        );
        assert_eq!(result.headings_on_page(2).count(), 2);
        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());
    }
}
