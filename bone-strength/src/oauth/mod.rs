//! OAuth2 authorization-code login against the data provider.
//!
//! A browser moves through three states:
//!
//! * unauthenticated: no token in the session, `/` renders the consent page
//!   built from a [`ConsentRequest`];
//! * awaiting callback: the provider redirects back to `/receive_code/`
//!   with either `code` or `error` ([`CallbackParams`]);
//! * authenticated: the exchanged token sits in the session until the
//!   provider rejects it or the session expires.
//!
//! A failed exchange or a denied consent ends the flow with an error page.

pub mod client;
pub mod scope;
pub mod token;

pub use client::OAuthClient;
pub use token::{AccessToken, TokenResponse};

use serde::Deserialize;

/// Data for the link that sends the browser to the provider's consent screen.
#[derive(Debug, Clone)]
pub struct ConsentRequest {
    pub authorize_endpoint: String,
    pub client_id: String,
    pub scope: String,
    pub redirect_uri: String,
    pub return_path: String,
}

impl ConsentRequest {
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?redirect_uri={}&response_type=code&client_id={}&scope={}",
            self.authorize_endpoint,
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.scope),
        )
    }
}

/// Query string of the provider's redirect back to us.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Callback {
    Code(String),
    Denied {
        error: String,
        description: Option<String>,
    },
    Missing,
}

impl CallbackParams {
    /// A non-empty `code` wins over `error`; with neither the callback is
    /// malformed.
    pub fn into_callback(self) -> Callback {
        match (self.code, self.error) {
            (Some(code), _) if !code.is_empty() => Callback::Code(code),
            (_, Some(error)) if !error.is_empty() => Callback::Denied {
                error,
                description: self.error_description,
            },
            _ => Callback::Missing,
        }
    }
}
