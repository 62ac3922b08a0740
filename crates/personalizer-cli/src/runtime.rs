//! In-process wiring of the background service and a client context.

use std::sync::Arc;

use anyhow::{Context, Result};
use personalizer_application::{
    BackgroundService, ContextKind, ContextRegistry, RuntimeClient, runtime_channel,
};
use personalizer_core::config::StorageConfig;
use personalizer_core::message::RuntimeResponse;
use personalizer_infrastructure::{StateStore, resolve_backend};
use tokio::task::JoinHandle;

/// A running background service plus the client the CLI talks through.
pub struct Runtime {
    background: Arc<BackgroundService>,
    client: RuntimeClient,
    server: JoinHandle<()>,
}

impl Runtime {
    pub fn start(storage: &StorageConfig) -> Result<Self> {
        let backend = resolve_backend(storage).context("Failed to resolve storage backend")?;
        let store = StateStore::new(backend);
        let background = Arc::new(BackgroundService::new(store, ContextRegistry::new()));

        let (requests, receiver) = runtime_channel();
        let server = tokio::spawn({
            let background = Arc::clone(&background);
            async move { background.serve(receiver).await }
        });

        Ok(Self {
            background,
            client: RuntimeClient::connected(requests, ContextKind::Options),
            server,
        })
    }

    pub fn background(&self) -> &BackgroundService {
        &self.background
    }

    pub fn client(&self) -> &RuntimeClient {
        &self.client
    }

    /// Closes the runtime channel and waits for the background to stop.
    pub async fn shutdown(self) {
        drop(self.client);
        if let Err(e) = self.server.await {
            tracing::warn!("Background service task failed: {}", e);
        }
    }
}

/// Turns a failed response into an error carrying its code.
pub fn ensure_ok(response: RuntimeResponse) -> Result<RuntimeResponse> {
    if !response.ok {
        anyhow::bail!(
            "request failed: {}",
            response.error_code().unwrap_or("unknown")
        );
    }
    Ok(response)
}
