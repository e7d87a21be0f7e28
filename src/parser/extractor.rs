//! Document-wide block extraction.

use crate::analysis::cleaner::clean_text;
use crate::analysis::LineAggregator;
use crate::error::Result;
use crate::model::{Block, Line};

use super::backend::{LineSource, RawLine};
use super::options::{ErrorMode, OutlineOptions};

/// Turns a [`LineSource`] into the ordered block sequence of a document.
///
/// Each selected page is read, its lines cleaned (empty lines dropped) and
/// aggregated, and the per-page blocks are concatenated in page order.
pub struct StructureExtractor<'a> {
    options: &'a OutlineOptions,
    aggregator: LineAggregator,
}

impl<'a> StructureExtractor<'a> {
    /// Create an extractor.
    pub fn new(options: &'a OutlineOptions) -> Self {
        Self {
            options,
            aggregator: LineAggregator::new(options.heuristics.gap_ratio),
        }
    }

    /// Extract the blocks of every selected page.
    pub fn extract<S: LineSource + ?Sized>(&self, source: &S) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();

        for page in 1..=source.page_count() {
            if !self.options.pages.includes(page) {
                continue;
            }

            match self.extract_page(source, page) {
                Ok(page_blocks) => blocks.extend(page_blocks),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Skipping page {}: {}", page, e);
                }
            }
        }

        Ok(blocks)
    }

    /// Extract the blocks of one page.
    pub fn extract_page<S: LineSource + ?Sized>(&self, source: &S, page: u32) -> Result<Vec<Block>> {
        let lines: Vec<Line> = source
            .page_lines(page)?
            .iter()
            .filter_map(clean_line)
            .collect();

        let blocks = self.aggregator.aggregate(&lines);
        log::debug!(
            "Page {}: {} lines merged into {} blocks",
            page,
            lines.len(),
            blocks.len()
        );
        Ok(blocks)
    }
}

/// Clean a raw line's text; `None` when nothing is left.
fn clean_line(raw: &RawLine) -> Option<Line> {
    let text = clean_text(&raw.text());
    if text.is_empty() {
        return None;
    }
    Some(Line::new(text, raw.size, raw.font.clone(), raw.bbox, raw.page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::BBox;
    use crate::parser::{MemorySource, PageSelection};

    fn raw(text: &str, size: f32, y0: f32, page: u32) -> RawLine {
        RawLine::single(text, size, "Arial-Bold", BBox::new(72.0, y0, 500.0, y0 + size), page)
    }

    /// Source whose second page always fails.
    struct FlakySource;

    impl LineSource for FlakySource {
        fn page_count(&self) -> u32 {
            3
        }

        fn page_lines(&self, page: u32) -> Result<Vec<RawLine>> {
            if page == 2 {
                return Err(Error::TextExtract("broken content stream".to_string()));
            }
            Ok(vec![raw(&format!("Page {} text", page), 10.0, 100.0, page)])
        }
    }

    #[test]
    fn test_cleans_and_drops_empty_lines() {
        let source = MemorySource::from_pages(vec![vec![
            raw("RFP RFP RFP Digital Library", 12.0, 100.0, 1),
            raw("   ", 12.0, 114.0, 1),
            raw("Reeeequest", 12.0, 200.0, 1),
        ]]);
        let options = OutlineOptions::default();
        let blocks = StructureExtractor::new(&options).extract(&source).unwrap();

        let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["RFP Digital Library", "Request"]);
        assert!(blocks[0].is_bold);
    }

    #[test]
    fn test_pages_concatenated_in_order() {
        let source = MemorySource::from_pages(vec![
            vec![raw("one", 10.0, 100.0, 1)],
            vec![raw("two", 10.0, 50.0, 2), raw("three", 10.0, 200.0, 2)],
        ]);
        let options = OutlineOptions::default();
        let blocks = StructureExtractor::new(&options).extract(&source).unwrap();

        let pages: Vec<_> = blocks.iter().map(|b| (b.page, b.text.as_str())).collect();
        assert_eq!(pages, vec![(1, "one"), (2, "two"), (2, "three")]);
    }

    #[test]
    fn test_page_selection() {
        let source = MemorySource::from_pages(vec![
            vec![raw("one", 10.0, 100.0, 1)],
            vec![raw("two", 10.0, 100.0, 2)],
        ]);
        let options = OutlineOptions::new().with_pages(PageSelection::Pages(vec![2]));
        let blocks = StructureExtractor::new(&options).extract(&source).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].page, 2);
    }

    #[test]
    fn test_strict_mode_fails_on_bad_page() {
        let options = OutlineOptions::default();
        let result = StructureExtractor::new(&options).extract(&FlakySource);
        assert!(matches!(result, Err(Error::TextExtract(_))));
    }

    #[test]
    fn test_lenient_mode_skips_bad_page() {
        let options = OutlineOptions::new().lenient();
        let blocks = StructureExtractor::new(&options)
            .extract(&FlakySource)
            .unwrap();
        let pages: Vec<_> = blocks.iter().map(|b| b.page).collect();
        assert_eq!(pages, vec![1, 3]);
    }
}
