//! Per-line text cleanup for rendering artifacts.
//!
//! Some PDF producers emit the same glyph or word several times on top of
//! each other (fake bold, shadow text). Extraction then yields strings like
//! "Reeeequest" or "RFP RFP RFP". The cleaner undoes both.
//!
//! Both passes are lossy: a genuine triple letter collapses too, and a word
//! that legitimately repeats later in the same line is dropped. The cleanup
//! is scoped to a single line and should not be treated as authoritative
//! text.

use std::collections::HashSet;

/// Clean one line of extracted text.
///
/// Runs [`collapse_repeated_chars`] then [`dedupe_tokens`] and trims the
/// result, which may be empty.
pub fn clean_text(text: &str) -> String {
    let collapsed = collapse_repeated_chars(text);
    dedupe_tokens(&collapsed).trim().to_string()
}

/// Collapse every run of 3 or more identical characters into one.
///
/// Runs of exactly two are kept, so "Book" survives while "Boook" becomes
/// "Bok".
pub fn collapse_repeated_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }

        let keep = if run >= 3 { 1 } else { run };
        for _ in 0..keep {
            out.push(c);
        }
    }

    out
}

/// Keep the first occurrence of each whitespace-separated token.
///
/// Comparison is exact and case-sensitive; the survivors are joined with
/// single spaces.
pub fn dedupe_tokens(text: &str) -> String {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .filter(|token| seen.insert(*token))
        .collect::<Vec<_>>()
        .join(" ")
}
