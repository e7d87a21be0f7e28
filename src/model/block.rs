//! Block type: adjacent lines merged into one visual unit.

use super::{BBox, Line};
use serde::{Deserialize, Serialize};

/// One or more contiguous lines merged by the vertical-gap rule.
///
/// Size, font, boldness, bbox and page are taken from the first member
/// line; `y0` is the smallest top edge across all members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Member texts joined with single spaces
    pub text: String,
    /// Font size of the first line
    pub size: f32,
    /// Font name of the first line
    pub font: String,
    /// Boldness of the first line
    pub is_bold: bool,
    /// Bounding box of the first line
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
    /// Topmost edge across member lines
    pub y0: f32,
    /// Number of member lines
    pub line_count: usize,
}

impl Block {
    /// Build a block from its member lines. Returns `None` for an empty slice.
    pub fn from_lines(lines: &[Line]) -> Option<Self> {
        let first = lines.first()?;

        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let y0 = lines
            .iter()
            .map(|l| l.bbox.y0)
            .fold(f32::INFINITY, f32::min);

        Some(Self {
            text,
            size: first.size,
            font: first.font.clone(),
            is_bold: first.is_bold,
            bbox: first.bbox,
            page: first.page,
            y0,
            line_count: lines.len(),
        })
    }

    /// Create a single-line block.
    pub fn from_line(line: Line) -> Self {
        Self {
            y0: line.bbox.y0,
            text: line.text,
            size: line.size,
            font: line.font,
            is_bold: line.is_bold,
            bbox: line.bbox,
            page: line.page,
            line_count: 1,
        }
    }

    /// Number of characters in the block text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
