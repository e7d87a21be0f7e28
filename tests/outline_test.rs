//! Integration tests for the outline pipeline over in-memory line sources.

use pdfoutline::analysis::{detect_title, HeadingClassifier};
use pdfoutline::render::{to_json, JsonFormat};
use pdfoutline::{
    infer_outline, outline_from_source, BBox, Block, HeadingLevel, Heuristics, Line,
    MemorySource, OutlineOptions, Outliner, PageSelection, RawLine,
};

fn raw(text: &str, size: f32, font: &str, y0: f32, page: u32) -> RawLine {
    RawLine::single(text, size, font, BBox::new(72.0, y0, 540.0, y0 + size), page)
}

fn block(text: &str, size: f32, y0: f32, page: u32) -> Block {
    Block::from_line(Line::new(
        text,
        size,
        "Arial",
        BBox::new(72.0, y0, 540.0, y0 + size),
        page,
    ))
}

/// A two-page request-for-proposal style document.
fn proposal() -> MemorySource {
    MemorySource::from_pages(vec![
        vec![
            raw("Ontario Libraries", 14.0, "Arial", 40.0, 1),
            raw(
                "RFP: Request for Proposal to Develop the Digital Library",
                20.0,
                "Arial-Bold",
                90.0,
                1,
            ),
            raw("1 Summary", 12.0, "Arial-Bold", 200.0, 1),
            raw("The library network will build a shared platform", 10.0, "Arial", 230.0, 1),
            raw("for all members of the consortium.", 10.0, "Arial", 242.0, 1),
            raw("1.1 Background", 11.0, "Arial-Bold", 300.0, 1),
            raw("1.1.1 Timeline", 10.0, "Arial-Bold", 360.0, 1),
        ],
        vec![
            raw("Appendix", 14.0, "Arial-Bold", 60.0, 2),
            raw("Further body text on page two.", 10.0, "Arial", 120.0, 2),
            raw("Closing remarks for the board.", 10.0, "Arial", 200.0, 2),
        ],
    ])
}

#[test]
fn test_end_to_end_numbered_levels() {
    let result = outline_from_source(&proposal(), &OutlineOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(
        result.title,
        "RFP: Request for Proposal to Develop the Digital Library"
    );

    let outline: Vec<_> = result
        .outline
        .iter()
        .map(|h| (h.level, h.text.as_str(), h.page))
        .collect();
    assert_eq!(
        outline,
        vec![
            (HeadingLevel::H2, "Ontario Libraries", 1),
            (HeadingLevel::H1, "1 Summary", 1),
            (HeadingLevel::H2, "1.1 Background", 1),
            (HeadingLevel::H3, "1.1.1 Timeline", 1),
            (HeadingLevel::H2, "Appendix", 2),
        ]
    );
}

#[test]
fn test_body_lines_merge_and_are_not_headings() {
    let result = outline_from_source(&proposal(), &OutlineOptions::default())
        .unwrap()
        .unwrap();
    assert!(result
        .outline
        .iter()
        .all(|h| !h.text.starts_with("The library network")));
}

#[test]
fn test_page_selection_limits_outline() {
    let options = OutlineOptions::new().with_pages(PageSelection::Range(2..=2));
    let result = outline_from_source(&proposal(), &options).unwrap().unwrap();

    // No page 1 blocks, so no title candidates
    assert_eq!(result.title, "");
    assert!(result.outline.iter().all(|h| h.page == 2));
}

#[test]
fn test_classification_is_idempotent() {
    let blocks = vec![
        block("Project Overview: A Plan For The Region", 22.0, 50.0, 1),
        block("Goals", 16.0, 150.0, 1),
        block("body", 10.0, 200.0, 1),
        block("body again", 10.0, 260.0, 1),
        block("2.3.1 Overview", 10.0, 300.0, 2),
        block("Scope", 14.0, 100.0, 3),
    ];

    let heuristics = Heuristics::default();
    let title = detect_title(&blocks, &heuristics);
    let classifier = HeadingClassifier::new(heuristics.clone());
    let first = classifier.classify(&blocks, &title);
    let second = classifier.classify(&blocks, &title);
    assert_eq!(first, second);

    assert_eq!(
        infer_outline(&blocks, &heuristics),
        infer_outline(&blocks, &heuristics)
    );
}

#[test]
fn test_size_tiers_when_unnumbered() {
    let blocks = vec![
        block("body one", 10.0, 300.0, 1),
        block("body two", 10.0, 330.0, 1),
        block("body three", 10.0, 360.0, 1),
        block("Section", 14.0, 200.0, 1),
        block("Chapter", 18.0, 100.0, 1),
    ];

    let result = infer_outline(&blocks, &Heuristics::default()).unwrap();
    let levels: Vec<_> = result
        .outline
        .iter()
        .map(|h| (h.text.as_str(), h.level))
        .collect();
    // Ordered by position on the page
    assert_eq!(
        levels,
        vec![("Chapter", HeadingLevel::H1), ("Section", HeadingLevel::H2)]
    );
}

#[test]
fn test_duplicate_headings_keep_first() {
    let blocks = vec![
        block("Heading", 16.0, 100.0, 1),
        block("text", 10.0, 150.0, 1),
        block("text too", 10.0, 200.0, 1),
        block("Heading", 16.0, 100.0, 2),
    ];

    let result = infer_outline(&blocks, &Heuristics::default()).unwrap();
    assert_eq!(result.outline.len(), 1);
    assert_eq!(result.outline[0].page, 1);
}

#[test]
fn test_numbered_depth_is_capped() {
    let blocks = vec![
        block("Technical Manual for the Network", 20.0, 40.0, 1),
        block("1.2.3.4.5 Something", 10.0, 100.0, 1),
    ];
    let result = infer_outline(&blocks, &Heuristics::default()).unwrap();
    assert_eq!(result.outline[0].level, HeadingLevel::H4);

    let shallow = Heuristics::new().with_max_numbered_depth(2);
    let result = infer_outline(&blocks, &shallow).unwrap();
    assert_eq!(result.outline[0].level, HeadingLevel::H2);
}

#[test]
fn test_empty_source_has_no_outline() {
    let source = MemorySource::from_pages(vec![vec![], vec![]]);
    assert!(Outliner::new().extract_source(&source).unwrap().is_none());
}

#[test]
fn test_json_payload_shape() {
    let result = outline_from_source(&proposal(), &OutlineOptions::default())
        .unwrap()
        .unwrap();
    let json = to_json(&result, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["title"].is_string());
    let first = &value["outline"][1];
    assert_eq!(first["level"], "H1");
    assert_eq!(first["text"], "1 Summary");
    assert_eq!(first["page"], 1);
}
