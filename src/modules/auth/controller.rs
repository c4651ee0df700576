use axum::{Json, extract::State};
use tracing::instrument;

use crate::state::AppState;

use super::model::{TokenCheckRequest, TokenCheckResponse};

/// Verifies a token from the request body and returns the identity it resolves to.
///
/// Public, but drawn from the stricter auth rate bucket.
#[instrument(skip_all)]
pub async fn token_check(
    State(state): State<AppState>,
    Json(dto): Json<TokenCheckRequest>,
) -> Json<TokenCheckResponse> {
    match state.verifier.verify(dto.token.trim()).await {
        Ok(claims) => Json(TokenCheckResponse {
            valid: true,
            identity: Some(claims.into_identity()),
        }),
        Err(err) => {
            tracing::debug!(reason = %err, "token check rejected token");
            Json(TokenCheckResponse {
                valid: false,
                identity: None,
            })
        }
    }
}
