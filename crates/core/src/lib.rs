//! Encounter core data models.
//!
//! This crate defines the records exchanged between the selection engine,
//! the template store and their hosts.

#![warn(missing_docs)]

// Identities
mod id;

// Selection inputs and outputs
mod candidate;
mod selection;

// Persisted records
mod template;

// Re-exports
pub use id::*;

pub use candidate::{Candidate, CandidateMetadata};
pub use selection::{Constraints, Selection};
pub use template::EncounterTemplate;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
