use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    auth::receive_code,
    metrics::metrics,
};
use crate::middleware::metrics_middleware;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session = &state.settings.session;

    // Lax so the cookie survives the provider's cross-site redirect back to us
    let session_layer = SessionManagerLayer::new(state.session_store.clone())
        .with_name(session.cookie_name.clone())
        .with_secure(session.secure_cookie)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)))
        .with_signed(state.session_key.clone());

    Router::new()
        .route("/", get(index))
        .route("/receive_code/", get(receive_code))
        .route("/receive_code", get(receive_code))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest_service(
            "/static",
            ServeDir::new(&state.settings.server.static_path),
        )
        .route_layer(from_fn_with_state(state.clone(), metrics_middleware))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                // Path only: the callback query carries the authorization code.
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    path = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
