//! Tunable constants for block aggregation, title detection and heading
//! classification.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Heuristic thresholds shared by the analysis stages.
///
/// Values are immutable once handed to an analyzer; build a new value with
/// the `with_*` setters to tune a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Lines merge when the vertical gap is below `previous.size * gap_ratio`
    pub gap_ratio: f32,

    /// Title candidates must be longer than this many characters
    pub title_min_chars: usize,

    /// A colon title must have more than this many words
    pub title_colon_min_words: usize,

    /// Blocks longer than this many characters are never headings
    pub max_heading_chars: usize,

    /// TOC leader lines have more than this many '.' characters...
    pub toc_min_dots: usize,

    /// ...and more than this many ' ' characters
    pub toc_min_spaces: usize,

    /// Deepest level assigned by the numbered-prefix rule
    pub max_numbered_depth: u32,
}

impl Heuristics {
    /// Create heuristics with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line-merge gap ratio.
    pub fn with_gap_ratio(mut self, ratio: f32) -> Self {
        self.gap_ratio = ratio;
        self
    }

    /// Set the minimum title length.
    pub fn with_title_min_chars(mut self, chars: usize) -> Self {
        self.title_min_chars = chars;
        self
    }

    /// Set the word threshold for colon titles.
    pub fn with_title_colon_min_words(mut self, words: usize) -> Self {
        self.title_colon_min_words = words;
        self
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the TOC leader thresholds.
    pub fn with_toc_thresholds(mut self, dots: usize, spaces: usize) -> Self {
        self.toc_min_dots = dots;
        self.toc_min_spaces = spaces;
        self
    }

    /// Set the depth cap for numbered headings.
    pub fn with_max_numbered_depth(mut self, depth: u32) -> Self {
        self.max_numbered_depth = depth;
        self
    }

    /// Check that the values describe a usable configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.gap_ratio.is_finite() && self.gap_ratio > 0.0) {
            return Err(Error::Config(format!(
                "gap_ratio must be a positive number, got {}",
                self.gap_ratio
            )));
        }
        if self.max_numbered_depth == 0 {
            return Err(Error::Config(
                "max_numbered_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse heuristics from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let heuristics: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        heuristics.validate()?;
        Ok(heuristics)
    }

    /// Load heuristics from a JSON file.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            gap_ratio: 0.3,
            title_min_chars: 10,
            title_colon_min_words: 5,
            max_heading_chars: 300,
            toc_min_dots: 5,
            toc_min_spaces: 10,
            max_numbered_depth: 4,
        }
    }
}
