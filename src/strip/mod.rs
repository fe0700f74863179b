// file: src/strip/mod.rs
// description: line range stripping module exports
// reference: internal module structure

pub mod document;
pub mod range;
pub mod stripper;

pub use document::{SourceDocument, fingerprint, split_lines};
pub use range::{RemovalRange, remove_range};
pub use stripper::{LineRangeStripper, StripOptions, strip};
