use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FlowError;

/// Bearer credential issued by the token endpoint.
///
/// `Debug` is redacted so the value cannot end up in logs by accident.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// JSON body returned by `POST /token/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: AccessToken,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
}

impl TokenResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self, FlowError> {
        let response: TokenResponse = serde_json::from_slice(body)
            .map_err(|e| FlowError::TokenDecodeFailed(e.to_string()))?;

        if response.access_token.expose().is_empty() {
            return Err(FlowError::TokenDecodeFailed(
                "access_token is empty".to_string(),
            ));
        }

        Ok(response)
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &self.access_token)
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("scope", &self.scope)
            .finish()
    }
}
