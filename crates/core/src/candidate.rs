//! Candidate model - the adversaries an encounter may be filled with.

use crate::id::CandidateId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An item eligible for selection.
///
/// `weight` is the difficulty cost and `value` the reward (e.g. experience).
/// Both are signed so that out-of-range input reaches the engine and is
/// rejected there with a precise error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier, unique within one call
    pub id: CandidateId,

    /// Difficulty cost
    pub weight: i64,

    /// Reward
    pub value: i64,

    /// Descriptive data carried through untouched
    #[serde(flatten)]
    pub metadata: CandidateMetadata,
}

impl Candidate {
    /// Create a candidate without metadata.
    pub fn new(id: impl Into<CandidateId>, weight: i64, value: i64) -> Self {
        Self {
            id: id.into(),
            weight,
            value,
            metadata: CandidateMetadata::default(),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: CandidateMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Display label: the name if present, otherwise the identifier.
    pub fn label(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Descriptive metadata. The engine never inspects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Category, e.g. "undead"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Size class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Nature, e.g. "minion" or "elite"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<String>,

    /// Any other fields the caller attached
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CandidateMetadata {
    /// Metadata with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_metadata_is_flattened() {
        let json = r#"{
            "id": "orc-2",
            "weight": 4,
            "value": 100,
            "name": "Orc",
            "size": "medium",
            "lair": "cave"
        }"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();

        assert_eq!(candidate.id, CandidateId::new("orc-2"));
        assert_eq!(candidate.weight, 4);
        assert_eq!(candidate.value, 100);
        assert_eq!(candidate.metadata.name.as_deref(), Some("Orc"));
        assert_eq!(candidate.metadata.size.as_deref(), Some("medium"));
        assert!(candidate.metadata.category.is_none());
        assert_eq!(candidate.metadata.extra.get("lair"), Some(&serde_json::json!("cave")));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let plain = Candidate::new("c1", 1, 1);
        assert_eq!(plain.label(), "c1");

        let named = plain.with_metadata(CandidateMetadata::named("Wolf"));
        assert_eq!(named.label(), "Wolf");
    }
}
