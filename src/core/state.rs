use std::sync::Arc;

use crate::api::ApiClient;
use crate::core::config::Settings;
use crate::session::{FileStore, KeyValueStore, SessionStore};

/// Shared handle passed to every workflow and dashboard controller.
#[derive(Clone, Debug)]
pub struct ClientState {
    inner: Arc<InnerState>,
}

#[derive(Debug)]
struct InnerState {
    settings: Settings,
    api: ApiClient,
    store: SessionStore,
}

impl ClientState {
    pub fn new(settings: Settings, api: ApiClient, store: SessionStore) -> Self {
        Self { inner: Arc::new(InnerState { settings, api, store }) }
    }

    /// Builds the HTTP client from `settings` and opens the file store at the configured path.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let api = ApiClient::from_settings(&settings)?;
        let backend: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::new(settings.storage().store_path.clone()));
        Ok(Self::new(settings, api, SessionStore::new(backend)))
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }
}
