use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::FlowError;
use crate::oauth::AccessToken;
use crate::AppState;

/// The browser session's access-token slot.
///
/// Wraps the `tower_sessions::Session` together with the configured key so
/// handlers only ever see `Option<AccessToken>`.
pub struct TokenSlot {
    session: Session,
    key: String,
}

#[async_trait]
impl FromRequestParts<AppState> for TokenSlot {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        Ok(Self {
            session,
            key: state.settings.session.access_token_key.clone(),
        })
    }
}

impl TokenSlot {
    pub async fn get(&self) -> Result<Option<AccessToken>, FlowError> {
        Ok(self.session.get::<AccessToken>(&self.key).await?)
    }

    /// Store the token and persist the session immediately.
    pub async fn store(&self, token: &AccessToken) -> Result<(), FlowError> {
        self.session.insert(&self.key, token).await?;
        self.session.save().await?;
        Ok(())
    }

    /// Drop the token and the session record with it.
    pub async fn clear(&self) -> Result<(), FlowError> {
        self.session.flush().await?;
        Ok(())
    }
}
