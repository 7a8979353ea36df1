//! Storage trait abstraction.

use async_trait::async_trait;
use encounter_core::{EncounterTemplate, TemplateId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Storage abstraction for encounter templates.
///
/// Templates are opaque, already-validated records; backends never look
/// inside the saved selection.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Save a template (create or update).
    async fn save_template(&mut self, template: &EncounterTemplate) -> Result<()>;

    /// Load a template by ID.
    async fn load_template(&self, id: TemplateId) -> Result<Option<EncounterTemplate>>;

    /// List all templates, oldest first.
    async fn list_templates(&self) -> Result<Vec<EncounterTemplate>>;

    /// Delete a template. Returns whether a record was removed.
    async fn delete_template(&mut self, id: TemplateId) -> Result<bool>;

    /// Load a template, failing if it does not exist.
    async fn require_template(&self, id: TemplateId) -> Result<EncounterTemplate> {
        self.load_template(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("template {}", id)))
    }
}
