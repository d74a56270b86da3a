pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod scoring;
pub mod services;
pub mod session;
pub mod startup;

use config::Settings;
use oauth::OAuthClient;
use services::{metrics::Metrics, provider_client::ProviderClient};
use std::sync::Arc;
use tower_sessions::{cookie::Key, MemoryStore};

/// Shared application state: immutable settings, the provider clients and
/// the server-side session records.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub oauth_client: Arc<OAuthClient>,
    pub provider_client: Arc<ProviderClient>,
    pub metrics: Arc<Metrics>,
    pub session_key: Key,
    pub session_store: MemoryStore,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let session_key = settings.session.signing_key()?;
        let metrics = Metrics::new()?;

        Ok(Self {
            oauth_client: Arc::new(OAuthClient::new(settings.provider.clone())),
            provider_client: Arc::new(ProviderClient::new(settings.provider.clone())),
            metrics: Arc::new(metrics),
            settings: Arc::new(settings),
            session_key,
            session_store: MemoryStore::default(),
        })
    }
}
