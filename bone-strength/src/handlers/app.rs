use askama::Template;
use axum::{
    extract::{OriginalUri, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::FlowError;
use crate::oauth::{AccessToken, ConsentRequest};
use crate::scoring::{join_profiles, ProfileReport};
use crate::session::TokenSlot;
use crate::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub consent: ConsentRequest,
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub account_id: String,
    pub genotyped_profiles: usize,
    pub reports: Vec<ProfileReport>,
}

/// Consent page without a token; scored results with one.
///
/// When the provider rejects the stored token the session is dropped and
/// the browser is sent back here to log in again.
pub async fn index(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    tokens: TokenSlot,
) -> Result<Response, FlowError> {
    let Some(access_token) = tokens.get().await? else {
        let consent = state.oauth_client.consent(uri.path());
        return Ok(IndexTemplate { consent }.into_response());
    };

    match load_results(&state, &access_token).await {
        Ok(page) => Ok(page.into_response()),
        Err(FlowError::TokenExpiredOrInvalid { status }) => {
            tracing::info!(status, "Stored access token rejected, restarting login");
            tokens.clear().await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "Failed to load results");
            Err(e)
        }
    }
}

async fn load_results(
    state: &AppState,
    access_token: &AccessToken,
) -> Result<ResultTemplate, FlowError> {
    let provider = &state.provider_client;
    let (user, names, genotypes) = tokio::join!(
        provider.fetch_user(access_token),
        provider.fetch_names(access_token),
        provider.fetch_genotypes(access_token),
    );
    let (user, names, genotypes) = all_or_rejected_token(user, names, genotypes)?;

    let reports = join_profiles(&genotypes, &names.profiles);
    for report in &reports {
        state.metrics.record_score(report.result.category);
    }

    tracing::info!(
        account_id = %user.id,
        profiles = reports.len(),
        "Rendered bone strength results"
    );

    Ok(ResultTemplate {
        genotyped_profiles: user.genotyped_profiles(),
        account_id: user.id,
        reports,
    })
}

/// Combine the three fetches. A rejected token outranks any other failure,
/// whichever call finished first.
fn all_or_rejected_token<A, B, C>(
    a: Result<A, FlowError>,
    b: Result<B, FlowError>,
    c: Result<C, FlowError>,
) -> Result<(A, B, C), FlowError> {
    let mut errors = match (a, b, c) {
        (Ok(a), Ok(b), Ok(c)) => return Ok((a, b, c)),
        (a, b, c) => [a.err(), b.err(), c.err()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>(),
    };

    let index = errors
        .iter()
        .position(|e| matches!(e, FlowError::TokenExpiredOrInvalid { .. }))
        .unwrap_or(0);
    Err(errors.swap_remove(index))
}

pub async fn health_check() -> &'static str {
    "OK"
}
