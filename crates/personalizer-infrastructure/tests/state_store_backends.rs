//! StateStore behavior over real and failing backends.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use personalizer_core::PersonalizerError;
use personalizer_core::backend::KeyValueBackend;
use personalizer_core::error::Result;
use personalizer_core::persona::DEFAULT_PERSONA_ID;
use personalizer_core::state::{STORAGE_KEY, create_default};
use personalizer_infrastructure::{JsonFileBackend, StateStore};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Backend whose storage area is broken.
#[derive(Default)]
struct FailingBackend {
    writes: AtomicUsize,
}

#[async_trait]
impl KeyValueBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<Value>> {
        Err(PersonalizerError::backend("quota exceeded"))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(PersonalizerError::backend("quota exceeded"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn test_failed_read_falls_back_to_defaults() {
    let store = StateStore::new(Some(Arc::new(FailingBackend::default())));

    let state = store.read().await;
    assert_eq!(state.active_persona_id.as_deref(), Some(DEFAULT_PERSONA_ID));
    assert_eq!(state.personas, create_default().personas);
}

#[tokio::test]
async fn test_failed_write_is_dropped_silently() {
    let backend = Arc::new(FailingBackend::default());
    let store = StateStore::new(Some(backend.clone()));
    let mut watcher = store.watch();

    let returned = store
        .update(|mut state| {
            state.active_persona_id = Some("creator".to_string());
            state
        })
        .await;

    assert_eq!(returned.active_persona_id.as_deref(), Some("creator"));
    assert_eq!(backend.writes.load(Ordering::SeqCst), 1);
    assert!(watcher.try_recv().is_none());
}

#[tokio::test]
async fn test_file_backend_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("state.json");
    let store = StateStore::new(Some(Arc::new(JsonFileBackend::new(path.clone()))));

    let initial = store.read().await;
    assert_eq!(initial.active_persona_id.as_deref(), Some(DEFAULT_PERSONA_ID));
    assert_eq!(initial.personas, create_default().personas);
    assert!(!path.exists());

    store.push_history("creator").await;
    let written = store
        .update(|mut state| {
            state.active_persona_id = Some("creator".to_string());
            state
        })
        .await;

    let reopened = StateStore::new(Some(Arc::new(JsonFileBackend::new(path.clone()))));
    assert_eq!(reopened.read().await, written);

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[STORAGE_KEY]["version"], 1);
    assert_eq!(raw[STORAGE_KEY]["activePersonaId"], "creator");
}

#[tokio::test]
async fn test_legacy_file_is_repaired_on_first_update() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        json!({
            "codexState": {
                "activePersonaId": "deleted-persona",
                "personas": {},
                "history": [{ "timestamp": 1, "personaId": "creator" }, "garbage"]
            }
        })
        .to_string(),
    )
    .unwrap();

    let store = StateStore::new(Some(Arc::new(JsonFileBackend::new(path.clone()))));
    let state = store.update(|state| state).await;

    assert_eq!(state.active_persona_id.as_deref(), Some(DEFAULT_PERSONA_ID));
    assert_eq!(state.personas.len(), 3);
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.version, 1);

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[STORAGE_KEY]["activePersonaId"], DEFAULT_PERSONA_ID);
}
