//! Encounter templates - selections saved for reuse.

use crate::id::TemplateId;
use crate::selection::{Constraints, Selection};
use crate::Time;
use serde::{Deserialize, Serialize};

/// A named selection persisted by a template store.
///
/// The selection is kept as returned by the engine; the store never
/// re-validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterTemplate {
    /// Unique identifier
    pub id: TemplateId,

    /// Display name
    pub name: String,

    /// Budget the selection was computed under
    pub budget: i64,

    /// Capacity the selection was computed under
    pub capacity: i64,

    /// The saved selection
    pub selection: Selection,

    /// When it was created
    pub created_at: Time,

    /// When it was last changed
    pub updated_at: Time,
}

impl EncounterTemplate {
    /// Create a new template.
    pub fn new(name: impl Into<String>, constraints: Constraints, selection: Selection) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: TemplateId::new(),
            name: name.into(),
            budget: constraints.budget,
            capacity: constraints.capacity,
            selection,
            created_at: now,
            updated_at: now,
        }
    }

    /// Constraints the selection was computed under.
    pub fn constraints(&self) -> Constraints {
        Constraints::new(self.budget, self.capacity)
    }

    /// Change the display name.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Replace the saved selection and the constraints it was computed under.
    pub fn replace_selection(&mut self, constraints: Constraints, selection: Selection) {
        self.budget = constraints.budget;
        self.capacity = constraints.capacity;
        self.selection = selection;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Candidate;

    #[test]
    fn test_new_template_timestamps_match() {
        let template = EncounterTemplate::new("Ambush", Constraints::new(10, 3), Selection::empty());
        assert_eq!(template.created_at, template.updated_at);
        assert_eq!(template.constraints(), Constraints::new(10, 3));
    }

    #[test]
    fn test_rename_bumps_updated_at() {
        let mut template = EncounterTemplate::new("Ambush", Constraints::new(10, 3), Selection::empty());
        let created = template.created_at;
        template.rename("Night ambush");
        assert_eq!(template.name, "Night ambush");
        assert!(template.updated_at >= created);
        assert_eq!(template.created_at, created);
    }

    #[test]
    fn test_replace_selection() {
        let mut template = EncounterTemplate::new("Ambush", Constraints::new(10, 3), Selection::empty());
        let selection = Selection::from_candidates(vec![Candidate::new("wolf", 2, 50)]);
        template.replace_selection(Constraints::new(4, 1), selection.clone());
        assert_eq!(template.selection, selection);
        assert_eq!(template.budget, 4);
        assert_eq!(template.capacity, 1);
    }
}
