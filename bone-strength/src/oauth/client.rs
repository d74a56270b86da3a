use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use service_core::observability::TracedClientExt;

use super::scope::requested_scope;
use super::token::TokenResponse;
use super::ConsentRequest;
use crate::config::ProviderSettings;
use crate::error::FlowError;

/// Talks to the provider's OAuth endpoints.
pub struct OAuthClient {
    client: Client,
    settings: ProviderSettings,
    scope: String,
}

impl OAuthClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            scope: requested_scope(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Everything the consent page needs to send the browser to the
    /// provider. `return_path` is recorded, but logins always land on `/`.
    pub fn consent(&self, return_path: &str) -> ConsentRequest {
        ConsentRequest {
            authorize_endpoint: self.settings.endpoint("/authorize/"),
            client_id: self.settings.client_id.clone(),
            scope: self.scope.clone(),
            redirect_uri: self.settings.redirect_uri.clone(),
            return_path: return_path.to_string(),
        }
    }

    /// Exchange a single-use authorization code for an access token.
    ///
    /// Only a 200 with a decodable body succeeds. The code is never retried.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, FlowError> {
        let url = self.settings.endpoint("/token/");

        let form = [
            ("client_id", self.settings.client_id.as_str()),
            (
                "client_secret",
                self.settings.client_secret.expose_secret().as_str(),
            ),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .client
            .traced_post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Failed to reach token endpoint");
                FlowError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                error = %error_text,
                "Token endpoint rejected authorization code"
            );
            return Err(FlowError::ProviderRejected {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read token endpoint response");
            FlowError::TokenDecodeFailed(e.to_string())
        })?;

        TokenResponse::from_slice(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode token endpoint response");
            e
        })
    }
}
