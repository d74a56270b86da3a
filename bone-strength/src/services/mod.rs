pub mod metrics;
pub mod provider_client;
