use std::sync::Arc;

use axum::{Extension, extract::Query, response::Html};
use serde::Deserialize;

use crate::{api::AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Completes the login with the authorization code Spotify redirected back with.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<&'static str>, ApiError> {
    if let Some(error) = params.error {
        return Err(ApiError::BadRequest(format!(
            "Spotify authorization was not granted: {error}"
        )));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(ApiError::BadRequest("missing authorization code".to_string()));
    };

    state.tokens.complete_login(&code).await?;
    Ok(Html(
        "Spotify account authenticated. You can now access /spotify endpoints.",
    ))
}
