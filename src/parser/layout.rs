//! Page layout: content stream operations to positioned spans, spans to
//! lines.
//!
//! Only the text-showing subset of the content stream is interpreted.
//! Glyph widths are not read from font programs; a span's width is
//! estimated at half the font size per character.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::BBox;

use super::backend::{decode_text_simple, RawLine};

/// TJ adjustments (thousandths of an em) beyond this read as word spaces.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Estimated glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// A run of text with position and style information.
///
/// Coordinates are PDF user space (origin bottom-left, y up).
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span with an estimated width.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }

    /// Approximate top edge (ascender).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Approximate bottom edge (descender).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let v: Vec<f32> = operands.iter().take(6).filter_map(get_number).collect();
        match v.as_slice() {
            [a, b, c, d, e, f] => Some(Self {
                a: *a,
                b: *b,
                c: *c,
                d: *d,
                e: *e,
                f: *f,
            }),
            _ => None,
        }
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Length of the transformed text-space y unit.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text and graphics state tracked while walking a content stream.
struct TextState {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    in_text: bool,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            in_text: false,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        // Producers that use T* without TL still expect a line advance
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Advance the text position horizontally (text space units).
    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
    }

    /// Emit a span at the current position and advance past it.
    fn show(&mut self, text: String, spans: &mut Vec<TextSpan>) {
        let char_count = text.chars().count() as f32;

        if !text.trim().is_empty() {
            let rendering = self.text_matrix.then(&self.ctm);
            let effective_size = self.font_size * rendering.vertical_scale();
            spans.push(TextSpan::new(
                text,
                rendering.e,
                rendering.f,
                effective_size,
                self.font_name.clone(),
            ));
        }

        self.advance(char_count * self.font_size * AVG_CHAR_WIDTH);
    }
}

/// Interpret a page content stream into text spans.
pub(crate) fn extract_spans(
    doc: &LopdfDocument,
    content: &[u8],
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
) -> Result<Vec<TextSpan>> {
    let content =
        lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let decode = |font_key: &[u8], bytes: &[u8]| -> String {
        let encoding = fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(doc).ok());
        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    };

    let mut spans = Vec::new();
    let mut state = TextState::new();

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.ctm_stack.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.ctm = m.then(&state.ctm);
                }
            }
            "BT" => {
                state.in_text = true;
                state.text_matrix = Matrix::IDENTITY;
                state.line_matrix = Matrix::IDENTITY;
            }
            "ET" => state.in_text = false,
            "Tf" => {
                if let [Object::Name(key), size, ..] = operands.as_slice() {
                    state.font_name = fonts
                        .get(key.as_slice())
                        .and_then(|f| f.get(b"BaseFont").ok())
                        .and_then(|o| o.as_name().ok())
                        .map(|n| String::from_utf8_lossy(n).to_string())
                        .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                    state.font_key = key.clone();
                    state.font_size = get_number(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands.as_slice() {
                    let tx = get_number(tx).unwrap_or(0.0);
                    let ty = get_number(ty).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "T*" => state.next_line(),
            "Tj" if state.in_text => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = decode(&state.font_key, bytes);
                    state.show(text, &mut spans);
                }
            }
            "TJ" if state.in_text => {
                if let Some(Object::Array(items)) = operands.first() {
                    let mut combined = String::new();
                    let mut adjustment_total = 0.0;
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                combined.push_str(&decode(&state.font_key, bytes))
                            }
                            other => {
                                // Negative values move the next glyph right
                                let adjustment = -get_number(other).unwrap_or(0.0);
                                adjustment_total += adjustment;
                                if adjustment > TJ_SPACE_THRESHOLD
                                    && !combined.is_empty()
                                    && !combined.ends_with(char::is_whitespace)
                                {
                                    combined.push(' ');
                                }
                            }
                        }
                    }
                    state.show(combined, &mut spans);
                    state.advance(adjustment_total / 1000.0 * state.font_size);
                }
            }
            "'" | "\"" => {
                state.next_line();
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if state.in_text {
                    if let Some(Object::String(bytes, _)) = operands.get(text_idx) {
                        let text = decode(&state.font_key, bytes);
                        state.show(text, &mut spans);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Group spans sharing a baseline into lines, top to bottom.
///
/// `page_top` is the upper edge of the page in user space; it turns the
/// bottom-up PDF y axis into top-down line coordinates. Sizes are rounded
/// to 0.01pt.
pub(crate) fn group_spans_into_lines(
    mut spans: Vec<TextSpan>,
    page_top: f32,
    page: u32,
) -> Vec<RawLine> {
    if spans.is_empty() {
        return vec![];
    }

    // Sort spans by Y (descending, since PDF Y is bottom-up) then X
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y = spans[0].y;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;
        if !current.is_empty() && (span.y - current_y).abs() > y_tolerance {
            lines.push(build_line(std::mem::take(&mut current), page_top, page));
        }
        if current.is_empty() {
            current_y = span.y;
        }
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(build_line(current, page_top, page));
    }

    lines
}

fn build_line(mut spans: Vec<TextSpan>, page_top: f32, page: u32) -> RawLine {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

    let x0 = spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let x1 = spans.iter().map(TextSpan::right).fold(f32::NEG_INFINITY, f32::max);
    let top = spans.iter().map(TextSpan::top).fold(f32::NEG_INFINITY, f32::max);
    let bottom = spans.iter().map(TextSpan::bottom).fold(f32::INFINITY, f32::min);

    let size = round_size(spans[0].font_size);
    let font = spans[0].font_name.clone();

    RawLine::new(
        merge_abutting(spans),
        size,
        font,
        BBox::new(x0, page_top - top, x1, page_top - bottom),
        page,
    )
}

/// Join x-sorted spans into word runs.
///
/// A span continues the previous run when the gap between them is at most
/// a fifth of its average glyph width, when either side already carries
/// whitespace at the seam, or when both sides of the seam are CJK. Runs are
/// later joined with single spaces.
fn merge_abutting(spans: Vec<TextSpan>) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut prev: Option<TextSpan> = None;

    for span in spans {
        let continues = match (&prev, runs.last()) {
            (Some(prev), Some(run)) => {
                let char_count = span.text.chars().count();
                let avg_char_width = if char_count > 0 && span.width > 0.0 {
                    span.width / char_count as f32
                } else {
                    span.font_size * AVG_CHAR_WIDTH
                };
                let gap = span.x - prev.right();

                let spaced_seam = run.ends_with(char::is_whitespace)
                    || span.text.starts_with(char::is_whitespace);
                let cjk_seam = run.chars().last().is_some_and(is_spaceless_script_char)
                    && span.text.chars().next().is_some_and(is_spaceless_script_char);

                gap <= avg_char_width * 0.2 || spaced_seam || cjk_seam
            }
            _ => false,
        };

        match runs.last_mut() {
            Some(run) if continues => run.push_str(&span.text),
            _ => runs.push(span.text.clone()),
        }
        prev = Some(span);
    }

    runs
}

/// Scripts written without spaces between words (Han, kana, CJK punctuation).
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana and Katakana
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Round a font size to two decimals.
pub(crate) fn round_size(size: f32) -> f32 {
    (size * 100.0).round() / 100.0
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
