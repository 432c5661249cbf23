use std::sync::Arc;

use crate::{
    auth::SessionIdentity,
    builder::TripBuilder,
    cache::TripCache,
    config::AppConfig,
    services::{
        api::{HttpTripApi, TripApi},
        store::StateStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub api: Arc<dyn TripApi>,
    pub store: StateStore,
    pub session: SessionIdentity,
    pub cache: TripCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let api = Arc::new(HttpTripApi::new(config.api_base.clone()));
        Self::with_api(config, api)
    }

    /// Wires the state around an injected collaborator, which is how tests
    /// substitute an in-memory record store.
    pub fn with_api(config: AppConfig, api: Arc<dyn TripApi>) -> Self {
        let store = StateStore::new(config.state_dir.clone());
        let session = SessionIdentity::new(store.clone());
        let cache = TripCache::new(store.clone());
        Self {
            config,
            api,
            store,
            session,
            cache,
        }
    }

    pub fn builder(&self) -> TripBuilder {
        TripBuilder::new(self.api.clone(), self.session.clone(), self.cache.clone())
    }
}
