#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use bone_strength::config::Settings;
use bone_strength::startup::build_router;
use bone_strength::services::provider_client::ProviderClient;
use bone_strength::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::MockServer;

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const COOKIE_NAME: &str = "bone_strength_session";
const COOKIE_SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

pub fn test_settings(api_uri: &str) -> Settings {
    let config = config::Config::builder()
        .set_override("server.host", "127.0.0.1")
        .unwrap()
        .set_override("server.port", 0)
        .unwrap()
        .set_override("server.static_path", "static")
        .unwrap()
        .set_override("server.log_level", "error")
        .unwrap()
        .set_override("provider.client_id", CLIENT_ID)
        .unwrap()
        .set_override("provider.client_secret", CLIENT_SECRET)
        .unwrap()
        .set_override("provider.redirect_uri", "http://localhost:5000/receive_code/")
        .unwrap()
        .set_override("provider.api_uri", api_uri)
        .unwrap()
        .set_override("session.cookie_name", COOKIE_NAME)
        .unwrap()
        .set_override("session.access_token_key", "access_token")
        .unwrap()
        .set_override("session.cookie_secret", COOKIE_SECRET)
        .unwrap()
        .build()
        .expect("Failed to build test configuration");

    Settings::from_config(config).expect("Test configuration must be valid")
}

/// Router wired to a wiremock provider; requests share one session store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub provider: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let provider = MockServer::start().await;
        let state = AppState::new(test_settings(&provider.uri())).unwrap();
        let router = build_router(state.clone());
        Self {
            router,
            state,
            provider,
        }
    }

    /// Keep the sessions but send data API calls to `api_uri`.
    pub fn with_data_api(mut self, api_uri: &str) -> Self {
        let provider = test_settings(api_uri).provider;
        self.state.provider_client = Arc::new(ProviderClient::new(provider));
        self.router = build_router(self.state.clone());
        self
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

/// `name=value` pair of the session cookie set by a response, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(COOKIE_NAME))
        .and_then(|value| value.split(';').next())
        .map(|pair| pair.to_string())
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
