//! # pdfoutline
//!
//! Infers a document's title and hierarchical heading outline (H1..H4 with
//! page numbers) from the typography and geometry of its text lines.
//!
//! The document itself carries no structure information: levels are derived
//! from font sizes, numbering prefixes and position on the page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     if let Some(result) = extract_outline("document.pdf")? {
//!         let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!         println!("{}", json);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: a [`LineSource`] yields styled lines per page
//! - **Cleaning**: repeated characters and tokens are collapsed
//! - **Aggregation**: vertically adjacent lines merge into blocks
//! - **Inference**: title detection, then heading classification
//! - **Batch**: whole directories processed in parallel with Rayon

pub mod analysis;
pub mod batch;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analysis::{infer_outline, FontStatistics, HeadingClassifier, Heuristics};
pub use batch::{run_batch, BatchEvent, BatchOptions, BatchReport};
pub use error::{Error, Result};
pub use model::{BBox, Block, Heading, HeadingLevel, Line, OutlineResult};
pub use parser::{
    ErrorMode, LineSource, LopdfSource, MemorySource, OutlineOptions, PageSelection, RawLine,
    StructureExtractor,
};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file.
///
/// Returns `Ok(None)` when the document has no extractable text.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline;
///
/// if let Some(result) = extract_outline("document.pdf").unwrap() {
///     println!("{}: {} headings", result.title, result.len());
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Option<OutlineResult>> {
    extract_outline_with_options(path, &OutlineOptions::default())
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline_with_options, OutlineOptions, PageSelection};
///
/// let options = OutlineOptions::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=20));
/// let result = extract_outline_with_options("document.pdf", &options).unwrap();
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<Option<OutlineResult>> {
    let source = LopdfSource::load_file(path)?;
    outline_from_source(&source, options)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<Option<OutlineResult>> {
    extract_outline_from_bytes_with_options(data, &OutlineOptions::default())
}

/// Extract the outline of a PDF held in memory with custom options.
pub fn extract_outline_from_bytes_with_options(
    data: &[u8],
    options: &OutlineOptions,
) -> Result<Option<OutlineResult>> {
    let source = LopdfSource::load_bytes(data)?;
    outline_from_source(&source, options)
}

/// Run the full pipeline over any line source.
///
/// This is the entry point for callers with their own extraction layer:
/// wrap pre-extracted lines in a [`MemorySource`] or implement
/// [`LineSource`] directly.
///
/// # Example
///
/// ```
/// use pdfoutline::{outline_from_source, BBox, MemorySource, OutlineOptions, RawLine};
///
/// let line = |text: &str, size: f32, y0: f32| {
///     RawLine::single(text, size, "Arial", BBox::new(72.0, y0, 500.0, y0 + size), 1)
/// };
/// let source = MemorySource::from_pages(vec![vec![
///     line("Annual Report of the Library Board", 20.0, 60.0),
///     line("1 Introduction", 14.0, 140.0),
///     line("Body text follows here.", 10.0, 180.0),
/// ]]);
///
/// let result = outline_from_source(&source, &OutlineOptions::default())?.unwrap();
/// assert_eq!(result.title, "Annual Report of the Library Board");
/// assert_eq!(result.outline[0].text, "1 Introduction");
/// # Ok::<(), pdfoutline::Error>(())
/// ```
pub fn outline_from_source<S: LineSource + ?Sized>(
    source: &S,
    options: &OutlineOptions,
) -> Result<Option<OutlineResult>> {
    options.heuristics.validate()?;

    let blocks = StructureExtractor::new(options).extract(source)?;
    if blocks.is_empty() {
        log::debug!("No text blocks extracted; no outline");
        return Ok(None);
    }

    Ok(infer_outline(&blocks, &options.heuristics))
}

/// Builder for extracting outlines.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{Heuristics, Outliner};
///
/// let result = Outliner::new()
///     .with_heuristics(Heuristics::new().with_max_numbered_depth(3))
///     .lenient()
///     .extract("document.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Outliner {
    options: OutlineOptions,
}

impl Outliner {
    /// Create a new Outliner builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heuristic thresholds.
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.options = self.options.with_heuristics(heuristics);
        self
    }

    /// Skip unreadable pages instead of failing the document.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// The accumulated options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Option<OutlineResult>> {
        extract_outline_with_options(path, &self.options)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Option<OutlineResult>> {
        extract_outline_from_bytes_with_options(data, &self.options)
    }

    /// Extract the outline from any line source.
    pub fn extract_source<S: LineSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Option<OutlineResult>> {
        outline_from_source(source, &self.options)
    }
}
