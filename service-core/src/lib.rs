//! service-core: shared HTTP infrastructure for the bone-strength frontend.
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
