//! Outline inference from typography and geometry.
//!
//! The analysis stages are pure functions over immutable records:
//!
//! 1. [`cleaner`] normalizes each line's text.
//! 2. [`LineAggregator`] merges a page's lines into blocks.
//! 3. [`TitleDetector`] picks the title among page-1 blocks.
//! 4. [`HeadingClassifier`] assigns heading levels to the remaining blocks.

mod aggregate;
pub mod cleaner;
mod classify;
mod heuristics;
mod title;

pub use aggregate::LineAggregator;
pub use classify::{ClassificationRule, FontStatistics, HeadingClassifier, Verdict};
pub use heuristics::Heuristics;
pub use title::{detect_title, TitleDetector};

use crate::model::{Block, OutlineResult};

/// Infer the title and outline of a document from its block sequence.
///
/// Returns `None` when there are no blocks at all (for example a scanned
/// document without a text layer).
pub fn infer_outline(blocks: &[Block], heuristics: &Heuristics) -> Option<OutlineResult> {
    if blocks.is_empty() {
        return None;
    }

    let title = detect_title(blocks, heuristics);
    let outline = HeadingClassifier::new(heuristics.clone()).classify(blocks, &title);

    log::debug!(
        "Inferred outline: title {:?}, {} headings from {} blocks",
        title,
        outline.len(),
        blocks.len()
    );

    Some(OutlineResult::new(title, outline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, HeadingLevel, Line};

    #[test]
    fn test_infer_outline_empty() {
        assert!(infer_outline(&[], &Heuristics::default()).is_none());
    }

    #[test]
    fn test_title_never_repeated_as_heading() {
        let blocks = vec![
            Block::from_line(Line::new(
                "Annual Report of the Board",
                24.0,
                "Arial-Bold",
                BBox::new(72.0, 50.0, 500.0, 74.0),
                1,
            )),
            Block::from_line(Line::new(
                "body text",
                10.0,
                "Arial",
                BBox::new(72.0, 100.0, 500.0, 110.0),
                1,
            )),
            Block::from_line(Line::new(
                "Summary",
                16.0,
                "Arial-Bold",
                BBox::new(72.0, 140.0, 500.0, 156.0),
                1,
            )),
        ];

        let result = infer_outline(&blocks, &Heuristics::default()).unwrap();
        assert_eq!(result.title, "Annual Report of the Board");
        assert_eq!(result.outline.len(), 1);
        assert_eq!(result.outline[0].text, "Summary");
        // 24pt is the top tier even though the title block is excluded
        assert_eq!(result.outline[0].level, HeadingLevel::H2);
    }
}
