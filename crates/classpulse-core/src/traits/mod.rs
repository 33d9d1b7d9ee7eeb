//! Cross-crate contracts.

pub mod tagger;

pub use tagger::{SketchTagger, TagGenerator};
