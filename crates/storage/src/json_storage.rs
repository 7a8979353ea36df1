//! JSON file storage implementation.
//!
//! Stores each template as a JSON file under `templates/` and keeps a small
//! per-record meta marker (version + updated_at) under `meta/templates/`.

use std::path::{Path, PathBuf};
use encounter_core::{EncounterTemplate, TemplateId};
use super::{Storage, Result};
use tokio::fs;
use tracing::{debug, warn};

const TEMPLATES: &str = "templates";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the data and meta
    /// directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join(TEMPLATES)).await?;
        fs::create_dir_all(root.join("meta").join(TEMPLATES)).await?;

        Ok(Self { root })
    }

    /// Number of times a template has been saved, or 0 if never.
    pub async fn template_version(&self, id: TemplateId) -> Result<u64> {
        Ok(read_meta_version(&self.meta_path(TEMPLATES, &id.to_string())).await)
    }

    fn template_path(&self, id: TemplateId) -> PathBuf {
        self.root.join(TEMPLATES).join(format!("{}.json", id))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let version = read_meta_version(&path).await + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_template(&mut self, template: &EncounterTemplate) -> Result<()> {
        let path = self.template_path(template.id);
        let json = serde_json::to_string_pretty(template)?;
        fs::write(&path, json.as_bytes()).await?;

        let version = self.bump_version(TEMPLATES, &template.id.to_string()).await?;
        debug!("Saved template {} (version {})", template.id, version);
        Ok(())
    }

    async fn load_template(&self, id: TemplateId) -> Result<Option<EncounterTemplate>> {
        read_json(&self.template_path(id)).await
    }

    async fn list_templates(&self) -> Result<Vec<EncounterTemplate>> {
        let mut templates = list_dir(&self.root.join(TEMPLATES)).await?;
        templates.sort_by(|a: &EncounterTemplate, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
        });
        Ok(templates)
    }

    async fn delete_template(&mut self, id: TemplateId) -> Result<bool> {
        let removed = remove_if_exists(&self.template_path(id)).await?;
        remove_if_exists(&self.meta_path(TEMPLATES, &id.to_string())).await?;
        if removed {
            debug!("Deleted template {}", id);
        }
        Ok(removed)
    }
}

async fn read_meta_version(path: &Path) -> u64 {
    match fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
            .ok()
            .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0),
        Err(_) => 0,
    }
}

async fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable record {}: {}", path.display(), e),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use encounter_core::{Candidate, Constraints, Selection};

    fn create_test_template(name: &str) -> EncounterTemplate {
        let selection = Selection::from_candidates(vec![
            Candidate::new("goblin-1", 2, 50),
            Candidate::new("goblin-2", 2, 50),
        ]);
        EncounterTemplate::new(name, Constraints::new(6, 3), selection)
    }

    #[tokio::test]
    async fn test_save_and_load_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let template = create_test_template("Goblin patrol");
        storage.save_template(&template).await.unwrap();

        let loaded = storage.load_template(template.id).await.unwrap();
        assert_eq!(loaded, Some(template));
    }

    #[tokio::test]
    async fn test_load_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        assert!(storage.load_template(TemplateId::new()).await.unwrap().is_none());
        assert!(matches!(
            storage.require_template(TemplateId::new()).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut template = create_test_template("Goblin patrol");
        storage.save_template(&template).await.unwrap();
        assert_eq!(storage.template_version(template.id).await.unwrap(), 1);

        template.rename("Goblin war band");
        storage.save_template(&template).await.unwrap();
        assert_eq!(storage.template_version(template.id).await.unwrap(), 2);

        let loaded = storage.require_template(template.id).await.unwrap();
        assert_eq!(loaded.name, "Goblin war band");
        assert_eq!(storage.list_templates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_templates_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let first = create_test_template("First");
        let mut second = create_test_template("Second");
        second.created_at = first.created_at + chrono::Duration::seconds(5);

        storage.save_template(&second).await.unwrap();
        storage.save_template(&first).await.unwrap();

        let names: Vec<_> = storage
            .list_templates()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_delete_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let template = create_test_template("Goblin patrol");
        storage.save_template(&template).await.unwrap();

        assert!(storage.delete_template(template.id).await.unwrap());
        assert!(storage.load_template(template.id).await.unwrap().is_none());
        assert_eq!(storage.template_version(template.id).await.unwrap(), 0);

        // Deleting again is not an error.
        assert!(!storage.delete_template(template.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        storage.save_template(&create_test_template("Good")).await.unwrap();
        fs::write(dir.path().join(TEMPLATES).join("broken.json"), b"{not json")
            .await
            .unwrap();
        fs::write(dir.path().join(TEMPLATES).join("notes.txt"), b"ignored")
            .await
            .unwrap();

        let templates = storage.list_templates().await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Good");
    }
}
