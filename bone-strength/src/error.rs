use askama::Template;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything that can go wrong while logging in or loading results.
///
/// None of these escape the request: each renders its own response.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("token endpoint rejected the authorization code with status {status}")]
    ProviderRejected { status: u16 },

    #[error("token endpoint returned an undecodable body: {0}")]
    TokenDecodeFailed(String),

    #[error("provider rejected the access token with status {status}")]
    TokenExpiredOrInvalid { status: u16 },

    #[error("provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("unexpected payload from {endpoint}: {reason}")]
    MalformedPayload { endpoint: String, reason: String },

    #[error("consent denied: {error}")]
    ProviderDeniedConsent {
        error: String,
        description: Option<String>,
    },

    #[error("callback carried neither a code nor an error")]
    MissingCallbackParams,

    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl FlowError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::ProviderRejected { .. } => "provider_rejected",
            FlowError::TokenDecodeFailed(_) => "token_decode_failed",
            FlowError::TokenExpiredOrInvalid { .. } => "token_expired_or_invalid",
            FlowError::UpstreamUnavailable(_) => "upstream_unavailable",
            FlowError::MalformedPayload { .. } => "malformed_payload",
            FlowError::ProviderDeniedConsent { .. } => "provider_denied_consent",
            FlowError::MissingCallbackParams => "missing_callback_params",
            FlowError::Session(_) => "session",
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: &'static str,
    pub message: &'static str,
    pub offer_login: bool,
}

impl ErrorTemplate {
    fn login_failed() -> Self {
        Self {
            title: "Login failed",
            message: "We could not complete the login with your genetics provider. Please try again.",
            offer_login: true,
        }
    }

    fn unavailable() -> Self {
        Self {
            title: "Something went wrong",
            message: "Your genetics provider could not be reached or sent data we did not understand. Please try again later.",
            offer_login: false,
        }
    }
}

/// Plain-text body for a denied consent, echoing the provider's values.
pub fn consent_denied_message(error: &str, description: Option<&str>) -> String {
    match description {
        Some(description) if !description.is_empty() => format!("{}: {}", error, description),
        _ => error.to_string(),
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        match self {
            FlowError::ProviderRejected { .. } | FlowError::TokenDecodeFailed(_) => {
                (StatusCode::BAD_GATEWAY, ErrorTemplate::login_failed()).into_response()
            }
            // `index` clears the session and redirects itself; anywhere else the
            // stored token is still present, so offer a fresh login instead.
            FlowError::TokenExpiredOrInvalid { .. } => {
                (StatusCode::UNAUTHORIZED, ErrorTemplate::login_failed()).into_response()
            }
            FlowError::UpstreamUnavailable(_) | FlowError::MalformedPayload { .. } => {
                (StatusCode::BAD_GATEWAY, ErrorTemplate::unavailable()).into_response()
            }
            FlowError::ProviderDeniedConsent { error, description } => (
                StatusCode::FORBIDDEN,
                consent_denied_message(&error, description.as_deref()),
            )
                .into_response(),
            FlowError::MissingCallbackParams => (
                StatusCode::BAD_REQUEST,
                "Missing authorization code or error in callback",
            )
                .into_response(),
            FlowError::Session(err) => {
                tracing::error!(error = %err, "Session store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorTemplate::unavailable()).into_response()
            }
        }
    }
}
