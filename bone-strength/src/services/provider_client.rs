use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use service_core::observability::TracedClientExt;

use crate::config::ProviderSettings;
use crate::error::FlowError;
use crate::models::{genotype::GenotypePayload, GenotypeRecord, NamesResponse, UserRecord};
use crate::oauth::{scope::genotype_locations, AccessToken};

/// Raw result of an authenticated call: the body as received and the status.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Client for the provider's `/1/...` data API.
pub struct ProviderClient {
    client: Client,
    settings: ProviderSettings,
}

impl ProviderClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    /// Send one bearer-authenticated request. No retries.
    ///
    /// A body that cannot be read is logged and comes back empty; callers
    /// must treat an empty body as a failure.
    pub async fn fetch_json(
        &self,
        method: Method,
        url: &str,
        access_token: &AccessToken,
    ) -> Result<ApiResponse, FlowError> {
        let response = self
            .client
            .traced_request(method, url)
            .bearer_auth(access_token.expose())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Failed to reach provider API");
                FlowError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Failed to read provider API response");
                String::new()
            }
        };

        Ok(ApiResponse { status, body })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &AccessToken,
    ) -> Result<T, FlowError> {
        let url = self.settings.endpoint(path);
        let response = self.fetch_json(Method::GET, &url, access_token).await?;

        if response.status != StatusCode::OK {
            tracing::warn!(path = %path, status = %response.status, "Provider API rejected access token");
            return Err(FlowError::TokenExpiredOrInvalid {
                status: response.status.as_u16(),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to decode provider API response");
            FlowError::MalformedPayload {
                endpoint: path.to_string(),
                reason: e.to_string(),
            }
        })
    }

    pub async fn fetch_user(&self, access_token: &AccessToken) -> Result<UserRecord, FlowError> {
        self.fetch("/1/user/", access_token).await
    }

    pub async fn fetch_names(
        &self,
        access_token: &AccessToken,
    ) -> Result<NamesResponse, FlowError> {
        self.fetch("/1/names/", access_token).await
    }

    pub async fn fetch_genotypes(
        &self,
        access_token: &AccessToken,
    ) -> Result<Vec<GenotypeRecord>, FlowError> {
        let path = format!("/1/genotype/?locations={}", genotype_locations());
        let payload: GenotypePayload = self.fetch(&path, access_token).await?;
        Ok(payload.into_records())
    }
}
