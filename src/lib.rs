// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod journal;
pub mod models;
pub mod pipeline;
pub mod strip;
pub mod utils;

pub use config::{Config, JournalConfig, OutputConfig, PassConfig};
pub use error::{Result, StripError};
pub use journal::{JournalEntry, PassJournal};
pub use models::StripReport;
pub use pipeline::PassRunner;
pub use strip::{
    LineRangeStripper, RemovalRange, SourceDocument, StripOptions, remove_range, strip,
};
pub use utils::{OperationTimer, RangeIssue, Validator};
