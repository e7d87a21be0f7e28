//! Heading classification.
//!
//! Headings are found with two signals:
//!
//! - **Numbering**: text starting with an outline number such as `2.3.1 `
//!   gets a level from the number's depth.
//! - **Font size**: sizes larger than the body size form tiers; the largest
//!   tier is H1, the next H2, and so on.
//!
//! The checks run as an ordered list of [`ClassificationRule`]s, first
//! match wins, so numbering outranks size.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use crate::model::{Block, Heading, HeadingLevel};

use super::Heuristics;

/// Font size statistics for heading detection.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Body text font size (most common)
    pub body_size: f32,
    /// Font sizes larger than body, largest first
    pub heading_sizes: Vec<f32>,
    /// Observed sizes (hundredths of a point) with frequency
    pub size_histogram: BTreeMap<i64, usize>,
}

/// Histogram key: sizes are compared at 0.01pt precision.
fn size_key(size: f32) -> i64 {
    (size * 100.0).round() as i64
}

impl FontStatistics {
    /// Collect and analyze the sizes of a block sequence.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut stats = Self::default();
        for block in blocks {
            stats.add_size(block.size);
        }
        stats.analyze();
        stats
    }

    /// Add a font size observation. Non-positive sizes are ignored.
    pub fn add_size(&mut self, size: f32) {
        if size > 0.0 {
            *self.size_histogram.entry(size_key(size)).or_insert(0) += 1;
        }
    }

    /// Calculate body size and heading sizes.
    ///
    /// The body size is the most frequent size; when several sizes share
    /// the top count the smallest one wins. With no observations the body
    /// size is 0.0 and there are no heading sizes.
    pub fn analyze(&mut self) {
        let mut body: Option<(i64, usize)> = None;
        // Ascending key order, strict comparison keeps the smallest on ties
        for (&key, &count) in &self.size_histogram {
            if body.map_or(true, |(_, best)| count > best) {
                body = Some((key, count));
            }
        }

        let Some((body_key, _)) = body else {
            self.body_size = 0.0;
            self.heading_sizes.clear();
            return;
        };

        self.body_size = body_key as f32 / 100.0;
        self.heading_sizes = self
            .size_histogram
            .keys()
            .rev()
            .filter(|k| **k > body_key)
            .map(|k| *k as f32 / 100.0)
            .collect();
    }

    /// Tier level for a font size, or `None` for sizes that are not a
    /// heading tier (including anything at or below the body size).
    pub fn tier_level(&self, font_size: f32) -> Option<HeadingLevel> {
        let key = size_key(font_size);
        self.heading_sizes
            .iter()
            .position(|s| size_key(*s) == key)
            .map(|i| HeadingLevel::new(i as u32 + 1))
    }
}

/// Outcome of one rule for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The block is not a heading; stop evaluating
    Skip,
    /// The block is a heading at this level; stop evaluating
    Heading(HeadingLevel),
    /// No decision; try the next rule
    Continue,
}

/// A single step of the classification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Skip blocks with no text
    SkipEmpty,
    /// Skip text already emitted as a heading
    SkipSeen,
    /// Skip text equal to or contained in the title
    SkipTitle,
    /// Skip text longer than `max_heading_chars`
    SkipLong,
    /// Skip dotted table-of-contents leader lines
    SkipTocLeader,
    /// Level from a leading outline number ("2.3 ")
    NumberedPrefix,
    /// Level from the font size tier
    SizeTier,
}

impl ClassificationRule {
    /// Rules in their default evaluation order.
    pub const DEFAULT_ORDER: [ClassificationRule; 7] = [
        ClassificationRule::SkipEmpty,
        ClassificationRule::SkipSeen,
        ClassificationRule::SkipTitle,
        ClassificationRule::SkipLong,
        ClassificationRule::SkipTocLeader,
        ClassificationRule::NumberedPrefix,
        ClassificationRule::SizeTier,
    ];

    fn evaluate(&self, text: &str, block: &Block, ctx: &RuleContext<'_>) -> Verdict {
        let skip_if = |cond: bool| if cond { Verdict::Skip } else { Verdict::Continue };

        match self {
            Self::SkipEmpty => skip_if(text.is_empty()),
            Self::SkipSeen => skip_if(ctx.seen.contains(text)),
            Self::SkipTitle => skip_if(ctx.title.contains(text)),
            Self::SkipLong => skip_if(text.chars().count() > ctx.heuristics.max_heading_chars),
            Self::SkipTocLeader => {
                let dots = text.chars().filter(|c| *c == '.').count();
                let spaces = text.chars().filter(|c| *c == ' ').count();
                skip_if(dots > ctx.heuristics.toc_min_dots && spaces > ctx.heuristics.toc_min_spaces)
            }
            Self::NumberedPrefix => match ctx.numbered.find(text) {
                Some(m) => {
                    let dots = m.as_str().matches('.').count() as u32;
                    let depth = (dots + 1).min(ctx.heuristics.max_numbered_depth);
                    Verdict::Heading(HeadingLevel::new(depth))
                }
                None => Verdict::Continue,
            },
            Self::SizeTier => match ctx.stats.tier_level(block.size) {
                Some(level) => Verdict::Heading(level),
                None => Verdict::Continue,
            },
        }
    }
}

/// Per-run state the rules read from.
struct RuleContext<'a> {
    title: &'a str,
    seen: &'a HashSet<String>,
    stats: &'a FontStatistics,
    heuristics: &'a Heuristics,
    numbered: &'a Regex,
}

/// Classifies blocks into leveled headings.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    heuristics: Heuristics,
    rules: Vec<ClassificationRule>,
    numbered: Regex,
}

impl HeadingClassifier {
    /// Create a classifier with the default rule order.
    pub fn new(heuristics: Heuristics) -> Self {
        Self {
            heuristics,
            rules: ClassificationRule::DEFAULT_ORDER.to_vec(),
            numbered: Regex::new(r"^\d+(?:\.\d+)*\s+").unwrap(),
        }
    }

    /// Replace the rule list.
    pub fn with_rules(mut self, rules: Vec<ClassificationRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classify a document's blocks, excluding anything that matches the
    /// title.
    pub fn classify(&self, blocks: &[Block], title: &str) -> Vec<Heading> {
        let stats = FontStatistics::from_blocks(blocks);
        log::debug!(
            "Body size {:.2}pt, {} heading tiers: {:?}",
            stats.body_size,
            stats.heading_sizes.len(),
            stats.heading_sizes
        );
        self.classify_with_stats(blocks, title, &stats)
    }

    /// Classify using precomputed font statistics.
    pub fn classify_with_stats(
        &self,
        blocks: &[Block],
        title: &str,
        stats: &FontStatistics,
    ) -> Vec<Heading> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut found: Vec<(Heading, f32)> = Vec::new();

        for block in blocks {
            let text = block.text.trim();
            let verdict = {
                let ctx = RuleContext {
                    title,
                    seen: &seen,
                    stats,
                    heuristics: &self.heuristics,
                    numbered: &self.numbered,
                };
                self.evaluate(text, block, &ctx)
            };

            if let Verdict::Heading(level) = verdict {
                log::debug!("{} on page {}: {:?}", level, block.page, text);
                found.push((Heading::new(level, text, block.page), block.y0));
                seen.insert(text.to_string());
            }
        }

        found.sort_by(|(a, a_y0), (b, b_y0)| {
            a.page
                .cmp(&b.page)
                .then_with(|| a_y0.partial_cmp(b_y0).unwrap_or(Ordering::Equal))
        });
        found.into_iter().map(|(heading, _)| heading).collect()
    }

    fn evaluate(&self, text: &str, block: &Block, ctx: &RuleContext<'_>) -> Verdict {
        for rule in &self.rules {
            match rule.evaluate(text, block, ctx) {
                Verdict::Continue => continue,
                decided => return decided,
            }
        }
        Verdict::Skip
    }
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(Heuristics::default())
    }
}
