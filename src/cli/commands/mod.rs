//! Command execution functions.

mod build;

pub use build::{RunSummary, build_all};
