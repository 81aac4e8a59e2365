//! Saving and restoring the session across process restarts.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::state::SessionState;

/// Key under which the client stores its data in a shared document.
pub const NAMESPACE: &str = "docecm";

/// Module key inside the namespace.
const ACCOUNT_KEY: &str = "account";

#[async_trait]
pub trait SessionPersistence: Send + Sync + std::fmt::Debug {
    /// Load the last saved session, if there is one.
    async fn load(&self) -> Result<Option<SessionState>>;

    async fn save(&self, state: &SessionState) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}

/// Wrap a state into the namespaced document layout.
fn to_entry(state: &SessionState) -> Result<Value> {
    Ok(json!({
        ACCOUNT_KEY: serde_json::to_value(state)?,
        "savedAt": Utc::now().to_rfc3339(),
    }))
}

fn from_document(document: &Value) -> Result<Option<SessionState>> {
    match document.get(NAMESPACE).and_then(|ns| ns.get(ACCOUNT_KEY)) {
        Some(account) => Ok(Some(serde_json::from_value(account.clone())?)),
        None => Ok(None),
    }
}

/// JSON file on disk. Keys other than [`NAMESPACE`] are left untouched.
#[derive(Debug, Clone)]
pub struct FileSessionPersistence {
    path: PathBuf,
}

impl FileSessionPersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Option<Map<String, Value>>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Some(Map::new())),
            Ok(text) => match serde_json::from_str(&text)? {
                Value::Object(map) => Ok(Some(map)),
                _ => Err(Error::Persistence(format!(
                    "{} does not hold a JSON object",
                    self.path.display()
                ))),
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_document(&self, document: Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_string_pretty(&Value::Object(document))?;
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionPersistence for FileSessionPersistence {
    async fn load(&self) -> Result<Option<SessionState>> {
        let Some(document) = self.read_document().await? else {
            return Ok(None);
        };
        from_document(&Value::Object(document))
    }

    async fn save(&self, state: &SessionState) -> Result<()> {
        let mut document = self.read_document().await?.unwrap_or_default();
        document.insert(NAMESPACE.to_string(), to_entry(state)?);
        self.write_document(document).await?;
        debug!(name: "session.persisted", path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let Some(mut document) = self.read_document().await? else {
            return Ok(());
        };
        if document.remove(NAMESPACE).is_some() {
            self.write_document(document).await?;
        }
        Ok(())
    }
}

/// In-process storage, mostly for tests.
#[derive(Debug, Default)]
pub struct MemorySessionPersistence {
    document: Mutex<Option<Value>>,
}

impl MemorySessionPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Value>> {
        self.document
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionPersistence for MemorySessionPersistence {
    async fn load(&self) -> Result<Option<SessionState>> {
        match self.slot().as_ref() {
            Some(document) => from_document(document),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &SessionState) -> Result<()> {
        let document = json!({ NAMESPACE: to_entry(state)? });
        *self.slot() = Some(document);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::Mutation;

    fn sample_state() -> SessionState {
        let mut state = SessionState::default();
        state.apply(Mutation::SetApiUrl("http://ecm.local".into()));
        state.apply(Mutation::SetToken("T1".into()));
        state.apply(Mutation::SetUser(json!({"CultureCode": "en"})));
        state
    }

    #[tokio::test]
    async fn test_file_round_trip_keeps_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, r#"{"other": {"keep": true}}"#).await.unwrap();

        let store = FileSessionPersistence::new(&path);
        store.save(&sample_state()).await.unwrap();

        let restored = store.load().await.unwrap().unwrap();
        assert_eq!(restored, sample_state());

        let raw: Value = serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(raw["other"]["keep"], true);
        assert_eq!(raw[NAMESPACE][ACCOUNT_KEY]["token"], "T1");
    }

    #[tokio::test]
    async fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionPersistence::new(dir.path().join("absent.json"));
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_removes_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionPersistence::new(dir.path().join("session.json"));
        store.save(&sample_state()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_object_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "[1, 2]").await.unwrap();
        let err = FileSessionPersistence::new(&path).load().await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }

    #[tokio::test]
    async fn test_memory_round_trip() {
        let store = MemorySessionPersistence::new();
        assert!(store.load().await.unwrap().is_none());
        store.save(&sample_state()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample_state()));
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
