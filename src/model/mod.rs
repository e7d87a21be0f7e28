//! Data model for outline inference.
//!
//! Records flow one way: [`Line`]s from the extraction layer are merged
//! into [`Block`]s, and blocks are classified into a title and
//! [`Heading`]s collected in an [`OutlineResult`].

mod block;
mod line;
mod outline;

pub use block::Block;
pub use line::{is_bold_font, BBox, Line};
pub use outline::{Heading, HeadingLevel, OutlineResult};
