//! Extraction options and configuration.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::analysis::Heuristics;
use crate::error::{Error, Result};

/// Options for extracting an outline from one document.
#[derive(Debug, Clone, Default)]
pub struct OutlineOptions {
    /// Heuristic thresholds
    pub heuristics: Heuristics,

    /// How to treat pages whose content cannot be read
    pub error_mode: ErrorMode,

    /// Which pages contribute blocks
    pub pages: PageSelection,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heuristic thresholds.
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

/// Error handling mode for page-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any page error
    #[default]
    Strict,
    /// Log the failing page and continue with the rest
    Lenient,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Specific pages, sorted and unique
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Parse a selection string such as "all", "1-10" or "1,3,5-7".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let parse_page = |p: &str| -> Result<u32> {
            match p.trim().parse::<u32>() {
                Ok(0) | Err(_) => Err(Error::Config(format!("invalid page number {:?}", p))),
                Ok(n) => Ok(n),
            }
        };
        let parse_range = |part: &str| -> Result<Option<RangeInclusive<u32>>> {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_page(start)?, parse_page(end)?);
                    if start > end {
                        return Err(Error::Config(format!("reversed page range {:?}", part)));
                    }
                    Ok(Some(start..=end))
                }
                None => Ok(None),
            }
        };

        if !s.contains(',') {
            if let Some(range) = parse_range(s)? {
                return Ok(PageSelection::Range(range));
            }
        }

        let mut pages = BTreeSet::new();
        for part in s.split(',') {
            match parse_range(part)? {
                Some(range) => pages.extend(range),
                None => {
                    pages.insert(parse_page(part)?);
                }
            }
        }
        Ok(PageSelection::Pages(pages.into_iter().collect()))
    }
}
