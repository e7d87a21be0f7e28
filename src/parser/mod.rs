//! Extraction layer: line sources, page layout and block extraction.

mod backend;
mod extractor;
mod layout;
mod options;

pub use backend::{check_header, decode_text_simple, LineSource, LopdfSource, MemorySource, RawLine};
pub use extractor::StructureExtractor;
pub use layout::TextSpan;
pub use options::{ErrorMode, OutlineOptions, PageSelection};
