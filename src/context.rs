use std::sync::Arc;

use log::info;

use crate::{
    api::ApiClient,
    auth::SessionStore,
    config::Config,
    storage::{SqliteStorage, Storage},
    toast::ToastQueue,
    Error,
};

/// Everything the pages share, created once at start up and handed down
/// explicitly. Clones are cheap and share state.
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub session: SessionStore,
    pub toasts: ToastQueue,
}

impl AppContext {
    pub fn init(config: &Config) -> Result<AppContext, Error> {
        let storage = SqliteStorage::open(&config.storage_path)?;
        AppContext::with_storage(Arc::new(storage), config)
    }

    /// Like [`init`](Self::init), with storage supplied by the caller.
    pub fn with_storage(storage: Arc<dyn Storage>, config: &Config) -> Result<AppContext, Error> {
        let api = ApiClient::new(config.api_url.clone());
        let session = SessionStore::restore(storage, api.clone());
        let toasts = ToastQueue::new(config.toast_timeout)?;

        info!(
            "Client ready (api: {}, signed in: {})",
            api.base_url(),
            session.is_authenticated()
        );

        Ok(AppContext {
            api,
            session,
            toasts,
        })
    }

    /// Cancel everything still scheduled. The session stays persisted.
    pub fn shutdown(&self) {
        info!("Shutting down");
        self.toasts.clear();
    }
}
