use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::AppState;

/// Record count and latency per route. Labels use the matched route
/// template so static asset paths do not explode cardinality.
pub async fn metrics_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    state
        .metrics
        .observe_request(&method, &path, &status, start.elapsed().as_secs_f64());

    response
}
