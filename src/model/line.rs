//! Line-level types produced by the extraction layer.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in top-down page coordinates.
///
/// `y0` is the top edge and `y1` the bottom edge, so `y1 >= y0` for
/// well-formed geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// One row of cleaned text with position and font information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Cleaned text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font: String,
    /// Whether the font name suggests a bold face
    pub is_bold: bool,
    /// Bounding box in top-down coordinates
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Line {
    /// Create a new line. Boldness is derived from the font name.
    pub fn new(
        text: impl Into<String>,
        size: f32,
        font: impl Into<String>,
        bbox: BBox,
        page: u32,
    ) -> Self {
        let font = font.into();
        Self {
            text: text.into(),
            size,
            is_bold: is_bold_font(&font),
            font,
            bbox,
            page,
        }
    }

    /// Top edge of the line.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// Bottom edge of the line.
    pub fn bottom(&self) -> f32 {
        self.bbox.y1
    }
}

/// Heuristic bold check: the font name contains "bold" in any case.
pub fn is_bold_font(font_name: &str) -> bool {
    font_name.to_lowercase().contains("bold")
}
