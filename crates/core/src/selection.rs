//! Selection inputs and outputs.

use crate::candidate::Candidate;
use crate::id::CandidateId;
use serde::{Deserialize, Serialize};

/// Limits a selection has to respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Upper bound on summed weight
    pub budget: i64,

    /// Upper bound on selected count
    pub capacity: i64,
}

impl Constraints {
    /// Create constraints.
    pub fn new(budget: i64, capacity: i64) -> Self {
        Self { budget, capacity }
    }
}

/// The chosen subset plus its aggregate weight and value.
///
/// Selected candidates keep their input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Chosen candidates
    pub selected: Vec<Candidate>,

    /// Sum of selected weights
    pub total_weight: i64,

    /// Sum of selected values
    pub total_value: i64,
}

impl Selection {
    /// The empty selection.
    pub fn empty() -> Self {
        Self {
            selected: Vec::new(),
            total_weight: 0,
            total_value: 0,
        }
    }

    /// Build a selection from chosen candidates, summing their totals.
    pub fn from_candidates(selected: Vec<Candidate>) -> Self {
        let total_weight = selected.iter().map(|c| c.weight).sum();
        let total_value = selected.iter().map(|c| c.value).sum();
        Self {
            selected,
            total_weight,
            total_value,
        }
    }

    /// Number of selected candidates.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Identifiers of the selected candidates, in order.
    pub fn ids(&self) -> Vec<&CandidateId> {
        self.selected.iter().map(|c| &c.id).collect()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_candidates_sums_totals() {
        let selection = Selection::from_candidates(vec![
            Candidate::new("a", 4, 10),
            Candidate::new("c", 3, 7),
        ]);
        assert_eq!(selection.total_weight, 7);
        assert_eq!(selection.total_value, 17);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.ids(), vec![&CandidateId::new("a"), &CandidateId::new("c")]);
    }

    #[test]
    fn test_selection_uses_camel_case_wire_names() {
        let json = serde_json::to_value(Selection::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"selected": [], "totalWeight": 0, "totalValue": 0})
        );
    }
}
