//! Title detection on the first page.

use std::cmp::Ordering;

use crate::model::Block;

use super::Heuristics;

/// Picks the most likely document title among page-1 blocks.
#[derive(Debug, Clone)]
pub struct TitleDetector {
    min_chars: usize,
    colon_min_words: usize,
}

impl TitleDetector {
    /// Create a detector from the shared heuristics.
    pub fn new(heuristics: &Heuristics) -> Self {
        Self {
            min_chars: heuristics.title_min_chars,
            colon_min_words: heuristics.title_colon_min_words,
        }
    }

    /// Rank title candidates: biggest font first, then topmost.
    ///
    /// Blocks of `min_chars` characters or fewer are dropped; they are
    /// usually running headers or page numbers.
    pub fn candidates<'a>(&self, first_page: &[&'a Block]) -> Vec<&'a Block> {
        let mut candidates: Vec<&Block> = first_page
            .iter()
            .copied()
            .filter(|b| b.char_count() > self.min_chars)
            .collect();

        candidates.sort_by(|a, b| {
            b.size
                .partial_cmp(&a.size)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.y0.partial_cmp(&b.y0).unwrap_or(Ordering::Equal))
        });
        candidates
    }

    /// Detect the title among blocks on page 1.
    ///
    /// The first ranked candidate that reads like "Subject: longer subtitle"
    /// wins. Otherwise the top-ranked candidate is used, and an empty string
    /// is returned when there are no candidates.
    pub fn detect(&self, first_page: &[&Block]) -> String {
        let candidates = self.candidates(first_page);

        let subtitled = candidates.iter().find(|b| {
            b.text.contains(':') && b.text.split_whitespace().count() > self.colon_min_words
        });

        subtitled
            .or_else(|| candidates.first())
            .map(|b| b.text.trim().to_string())
            .unwrap_or_default()
    }
}

impl Default for TitleDetector {
    fn default() -> Self {
        Self::new(&Heuristics::default())
    }
}

/// Detect the title from a document-wide block sequence, using only the
/// blocks on page 1.
pub fn detect_title(blocks: &[Block], heuristics: &Heuristics) -> String {
    let first_page: Vec<&Block> = blocks.iter().filter(|b| b.page == 1).collect();
    TitleDetector::new(heuristics).detect(&first_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Line};

    fn block(text: &str, size: f32, y0: f32, page: u32) -> Block {
        Block::from_line(Line::new(
            text,
            size,
            "Arial",
            BBox::new(72.0, y0, 500.0, y0 + size),
            page,
        ))
    }

    #[test]
    fn test_no_candidates_returns_empty() {
        let blocks = vec![block("Page 1", 30.0, 10.0, 1), block("short", 20.0, 50.0, 1)];
        assert_eq!(detect_title(&blocks, &Heuristics::default()), "");
        assert_eq!(detect_title(&[], &Heuristics::default()), "");
    }

    #[test]
    fn test_largest_block_wins() {
        let blocks = vec![
            block("Annual Operating Report", 18.0, 200.0, 1),
            block("Quarterly Summary Notes", 24.0, 300.0, 1),
            block("Body text that is long enough", 10.0, 100.0, 1),
        ];
        assert_eq!(
            detect_title(&blocks, &Heuristics::default()),
            "Quarterly Summary Notes"
        );
    }

    #[test]
    fn test_tie_on_size_prefers_topmost() {
        let blocks = vec![
            block("Lower Candidate Text", 20.0, 300.0, 1),
            block("Upper Candidate Text", 20.0, 100.0, 1),
        ];
        assert_eq!(
            detect_title(&blocks, &Heuristics::default()),
            "Upper Candidate Text"
        );
    }

    #[test]
    fn test_colon_title_preferred_over_larger_block() {
        let blocks = vec![
            block("ONTARIO LIBRARIES", 28.0, 50.0, 1),
            block(
                "Request for Proposal: Digital Library System",
                16.0,
                120.0,
                1,
            ),
        ];
        assert_eq!(
            detect_title(&blocks, &Heuristics::default()),
            "Request for Proposal: Digital Library System"
        );
    }

    #[test]
    fn test_colon_title_needs_enough_words() {
        // Exactly 5 words is not enough
        let blocks = vec![
            block("Big Plain Heading Here", 28.0, 50.0, 1),
            block("Section: one two three four", 16.0, 120.0, 1),
        ];
        assert_eq!(
            detect_title(&blocks, &Heuristics::default()),
            "Big Plain Heading Here"
        );
    }

    #[test]
    fn test_ignores_other_pages() {
        let blocks = vec![
            block("First page heading", 14.0, 50.0, 1),
            block("Much larger on page two", 40.0, 50.0, 2),
        ];
        assert_eq!(
            detect_title(&blocks, &Heuristics::default()),
            "First page heading"
        );
    }

    #[test]
    fn test_length_threshold_is_strict() {
        // 10 characters exactly is excluded, 11 is kept
        let blocks = vec![
            block("0123456789", 30.0, 10.0, 1),
            block("0123456789A", 12.0, 40.0, 1),
        ];
        assert_eq!(detect_title(&blocks, &Heuristics::default()), "0123456789A");
    }
}
