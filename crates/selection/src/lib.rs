//! Encounter selection engine.
//!
//! Picks the subset of candidate adversaries that maximizes total value
//! while staying within a weight budget and a headcount capacity.

#![warn(missing_docs)]

pub mod error;
pub mod table;
pub mod engine;

pub use error::{SelectionError, ErrorCategory, Result};
pub use table::DecisionTable;
pub use engine::{SelectionEngine, EngineConfig, select};
