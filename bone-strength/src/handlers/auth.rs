use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::FlowError;
use crate::oauth::{Callback, CallbackParams};
use crate::session::TokenSlot;
use crate::AppState;

/// OAuth redirect target: exchange `code` for a token, or report the
/// provider's `error` back to the user.
#[tracing::instrument(skip_all)]
pub async fn receive_code(
    State(state): State<AppState>,
    tokens: TokenSlot,
    Query(params): Query<CallbackParams>,
) -> Result<Response, FlowError> {
    match params.into_callback() {
        Callback::Code(code) => {
            let token = match state.oauth_client.exchange_code(&code).await {
                Ok(token) => {
                    state.metrics.record_token_exchange("success");
                    token
                }
                Err(e) => {
                    state.metrics.record_token_exchange(e.kind());
                    return Err(e);
                }
            };

            tokens.store(&token.access_token).await?;

            tracing::info!(
                token_type = %token.token_type,
                expires_in = token.expires_in,
                "Authorization code exchanged"
            );

            Ok(Redirect::to("/").into_response())
        }
        Callback::Denied { error, description } => {
            tracing::warn!(error = %error, "Provider reported consent error");
            Err(FlowError::ProviderDeniedConsent { error, description })
        }
        Callback::Missing => {
            tracing::warn!("Callback without code or error");
            Err(FlowError::MissingCallbackParams)
        }
    }
}
