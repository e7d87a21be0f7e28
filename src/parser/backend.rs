//! Line source abstraction.
//!
//! The outline engine only needs per-page line records. [`LineSource`] is
//! the seam between the engine and whatever reads the PDF; [`LopdfSource`]
//! is the bundled implementation and [`MemorySource`] serves callers that
//! already have line geometry from another extraction layer.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::BBox;

use super::layout;

/// A line record as reported by the extraction layer, before cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    /// Word runs in left-to-right order; abutting spans are already merged
    pub spans: Vec<String>,
    /// Representative font size (first span)
    pub size: f32,
    /// Representative font name (first span)
    pub font: String,
    /// Bounding box in top-down page coordinates
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl RawLine {
    /// Create a new raw line.
    pub fn new(
        spans: Vec<String>,
        size: f32,
        font: impl Into<String>,
        bbox: BBox,
        page: u32,
    ) -> Self {
        Self {
            spans,
            size,
            font: font.into(),
            bbox,
            page,
        }
    }

    /// Create a raw line with a single span.
    pub fn single(
        text: impl Into<String>,
        size: f32,
        font: impl Into<String>,
        bbox: BBox,
        page: u32,
    ) -> Self {
        Self::new(vec![text.into()], size, font, bbox, page)
    }

    /// Span texts joined with single spaces and trimmed.
    pub fn text(&self) -> String {
        self.spans.join(" ").trim().to_string()
    }
}

/// Supplies ordered line records for each page of one document.
///
/// Implementations return text content only, lines ordered top to bottom,
/// with pages numbered from 1.
pub trait LineSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Line records of one page (1-indexed).
    fn page_lines(&self, page: u32) -> Result<Vec<RawLine>>;
}

/// Pre-extracted line records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Vec<RawLine>>,
}

impl MemorySource {
    /// Create a source from per-page line lists (index 0 = page 1).
    pub fn from_pages(pages: Vec<Vec<RawLine>>) -> Self {
        Self { pages }
    }
}

impl LineSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_lines(&self, page: u32) -> Result<Vec<RawLine>> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Validate the `%PDF-x.y` header and return the version string.
pub fn check_header(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    let mut chars = version.chars();
    let valid = matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(major), Some('.'), Some(minor)) if major.is_ascii_digit() && minor.is_ascii_digit()
    );
    if !valid {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(version)
}

/// [`LineSource`] backed by `lopdf::Document`.
///
/// The document is owned by the source and released when it is dropped.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    version: String,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let version = check_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;

        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }

        let pages = doc.get_pages();
        log::debug!("Loaded PDF {} with {} pages", version, pages.len());
        Ok(Self {
            doc,
            pages,
            version,
        })
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }

    /// MediaBox of a page, following inherited values up the page tree.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;

        // Bounded walk: malformed trees can contain Parent cycles
        for _ in 0..32 {
            if let Ok(obj) = dict.get(b"MediaBox") {
                let obj = match obj {
                    Object::Reference(r) => self.doc.get_object(*r).ok()?,
                    other => other,
                };
                let values: Vec<f32> = obj
                    .as_array()
                    .ok()?
                    .iter()
                    .filter_map(layout::get_number)
                    .collect();
                return match values.as_slice() {
                    [x0, y0, x1, y1] => Some([*x0, *y0, *x1, *y1]),
                    _ => None,
                };
            }

            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }
}

impl LineSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_lines(&self, page: u32) -> Result<Vec<RawLine>> {
        let page_id = self.page_id(page)?;

        // US Letter when the page tree carries no usable MediaBox
        let page_top = self
            .media_box(page_id)
            .map(|[_, y0, _, y1]| y0.max(y1))
            .unwrap_or(792.0);

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::TextExtract(format!("page {}: {}", page, e)))?;

        let spans = layout::extract_spans(&self.doc, &content, &fonts)?;
        log::debug!("Page {}: {} text spans", page, spans.len());

        Ok(layout::group_spans_into_lines(spans, page_top, page))
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
