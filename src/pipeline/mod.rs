// file: src/pipeline/mod.rs
// description: pass orchestration module exports
// reference: internal module structure

pub mod runner;

pub use runner::PassRunner;
