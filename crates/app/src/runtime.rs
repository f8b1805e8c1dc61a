//! Wires the concrete collaborators into an [`AppState`].

use crate::commands::attach_identity;
use crate::state::AppState;
use anyhow::Context;
use std::sync::Arc;
use studio_core::{BoxedStore, FileStore, MemoryStore};
use studio_services::{
    GeminiClient, LocalIdentityProvider, ServiceConfig, SimulatedStripe, Subscription,
};
use tracing::{info, warn};

pub type StudioRuntime = AppState<LocalIdentityProvider, SimulatedStripe, GeminiClient>;

/// The durable store named by the config, or the platform default.
///
/// Falls back to an in-memory store when there is no data directory, in
/// which case subscriptions do not survive a restart.
pub fn open_store(config: &ServiceConfig) -> BoxedStore {
    match config.storage_path.clone().or_else(FileStore::default_path) {
        Some(path) => {
            info!(path = %path.display(), "Using file store");
            Box::new(FileStore::new(path))
        }
        None => {
            warn!("No data directory available; subscriptions will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Build the runtime and start listening for identity changes.
///
/// The returned subscription keeps the listener attached; drop it to detach.
pub fn build_runtime(config: &ServiceConfig) -> anyhow::Result<(Arc<StudioRuntime>, Subscription)> {
    let ideas = GeminiClient::from_config(config).context("Failed to build the Gemini client")?;
    let state = Arc::new(AppState::new(
        open_store(config),
        LocalIdentityProvider::from_config(config),
        SimulatedStripe::from_config(config),
        ideas,
    ));
    let subscription = attach_identity(&state);
    Ok((state, subscription))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::app_get_state;
    use crate::state::View;

    #[test]
    fn test_build_runtime_reports_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ServiceConfig {
            storage_path: Some(dir.path().join("storage.json")),
            ..ServiceConfig::default()
        };

        let (state, _subscription) = build_runtime(&config).expect("runtime");
        let snapshot = app_get_state(&state).expect("snapshot");

        assert!(!snapshot.is_loading);
        assert!(snapshot.user.is_none());
        assert_eq!(snapshot.view, View::Landing);
    }
}
