//! Merge a page's lines into blocks using the vertical gap between them.

use crate::model::{Block, Line};

/// Groups the lines of one page into blocks.
///
/// A line joins the current block when the space between the previous
/// line's bottom edge and its own top edge is strictly less than
/// `previous.size * gap_ratio`. No other signal (indentation, columns, font
/// change) is considered.
#[derive(Debug, Clone, Copy)]
pub struct LineAggregator {
    gap_ratio: f32,
}

impl LineAggregator {
    /// Create an aggregator with the given gap ratio.
    pub fn new(gap_ratio: f32) -> Self {
        Self { gap_ratio }
    }

    /// Gap ratio in use.
    pub fn gap_ratio(&self) -> f32 {
        self.gap_ratio
    }

    /// Check whether `curr` continues the block that `prev` belongs to.
    pub fn continues(&self, prev: &Line, curr: &Line) -> bool {
        let gap = curr.bbox.y0 - prev.bbox.y1;
        gap < prev.size * self.gap_ratio
    }

    /// Group ordered (top-to-bottom) lines of a page into blocks.
    pub fn aggregate(&self, lines: &[Line]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut start = 0;

        for i in 1..lines.len() {
            if !self.continues(&lines[i - 1], &lines[i]) {
                blocks.extend(Block::from_lines(&lines[start..i]));
                start = i;
            }
        }

        blocks.extend(Block::from_lines(&lines[start..]));
        blocks
    }
}

impl Default for LineAggregator {
    fn default() -> Self {
        Self::new(0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn line(text: &str, size: f32, y0: f32) -> Line {
        Line::new(text, size, "Arial", BBox::new(72.0, y0, 400.0, y0 + size), 1)
    }

    #[test]
    fn test_empty_input() {
        assert!(LineAggregator::default().aggregate(&[]).is_empty());
    }

    #[test]
    fn test_single_line() {
        let blocks = LineAggregator::default().aggregate(&[line("Only", 12.0, 50.0)]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Only");
    }

    #[test]
    fn test_merges_small_gaps_in_order() {
        // bottom of first = 110, gap = 2 < 3
        let lines = vec![
            line("first", 10.0, 100.0),
            line("second", 10.0, 112.0),
            line("third", 10.0, 124.0),
        ];
        let blocks = LineAggregator::default().aggregate(&lines);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "first second third");
        assert_eq!(blocks[0].line_count, 3);
    }

    #[test]
    fn test_gap_equal_to_threshold_does_not_merge() {
        // 8 * 0.25 = 2.0, gap = 110 - 108 = 2.0
        let aggregator = LineAggregator::new(0.25);
        let lines = vec![line("first", 8.0, 100.0), line("second", 8.0, 110.0)];
        assert_eq!(aggregator.aggregate(&lines).len(), 2);
    }

    #[test]
    fn test_gap_equal_to_default_threshold_does_not_merge() {
        // Previous bottom edge at 0 so the gap is exactly size * 0.3
        let threshold = 10.0_f32 * 0.3;
        let lines = vec![line("first", 10.0, -10.0), line("second", 10.0, threshold)];
        assert_eq!(LineAggregator::default().aggregate(&lines).len(), 2);

        let lines = vec![
            line("first", 10.0, -10.0),
            line("second", 10.0, threshold - 0.01),
        ];
        assert_eq!(LineAggregator::default().aggregate(&lines).len(), 1);
    }

    #[test]
    fn test_threshold_uses_previous_line_size() {
        // Large previous line allows a bigger gap
        let lines = vec![line("Big Heading", 20.0, 100.0), line("small", 8.0, 125.0)];
        // gap = 125 - 120 = 5 < 20 * 0.3 = 6
        let blocks = LineAggregator::default().aggregate(&lines);
        assert_eq!(blocks.len(), 1);

        let lines = vec![line("small", 8.0, 100.0), line("Big Heading", 20.0, 113.0)];
        // gap = 113 - 108 = 5 >= 8 * 0.3 = 2.4
        let blocks = LineAggregator::default().aggregate(&lines);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_overlapping_lines_merge() {
        // Negative gap always merges
        let lines = vec![line("a", 10.0, 100.0), line("b", 10.0, 105.0)];
        assert_eq!(LineAggregator::default().aggregate(&lines).len(), 1);
    }

    #[test]
    fn test_blocks_preserve_order() {
        let lines = vec![
            line("one", 10.0, 100.0),
            line("two", 10.0, 140.0),
            line("three", 10.0, 180.0),
        ];
        let texts: Vec<_> = LineAggregator::default()
            .aggregate(&lines)
            .into_iter()
            .map(|b| b.text)
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }
}
