use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::{error, warn};

use hindemit_core::models::api::{ConversationRequest, SuggestionsResponse};
use hindemit_core::models::suggestion::INITIAL_SUGGESTIONS;
use hindemit_openrouter::error::ProviderError;
use hindemit_openrouter::suggestions::generate_suggestions;

use crate::state::AppState;

/// Starter questions for a fresh conversation. Always 200; a broken
/// suggestions file yields an empty list.
pub async fn initial_suggestions(State(state): State<AppState>) -> Json<SuggestionsResponse> {
    let suggestions = match &state.suggestions_file {
        None => INITIAL_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        Some(path) => match load_suggestions_file(path).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load initial suggestions");
                Vec::new()
            }
        },
    };
    Json(SuggestionsResponse::new(suggestions))
}

/// Read starter questions from a file holding either a JSON array of
/// strings or one question per line.
async fn load_suggestions_file(path: &Path) -> eyre::Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let trimmed = contents.trim();
    if trimmed.starts_with('[') {
        let list: Vec<String> = serde_json::from_str(trimmed)?;
        return Ok(list.into_iter().filter(|s| !s.trim().is_empty()).collect());
    }
    Ok(trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Generate follow-up questions for the conversation.
///
/// An undecodable body or a provider error becomes an empty 200
/// response. Only a missing API key is reported as an error.
pub async fn suggestions(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ConversationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "undecodable suggestions request");
            return Json(SuggestionsResponse::empty()).into_response();
        }
    };

    let Some(provider) = state.provider.as_deref() else {
        let body = SuggestionsResponse {
            suggestions: Vec::new(),
            error: Some(ProviderError::MissingApiKey.to_string()),
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    };

    match generate_suggestions(provider, &request.messages, request.model.as_deref()).await {
        Ok(suggestions) => Json(SuggestionsResponse::new(suggestions)).into_response(),
        Err(e) => {
            error!(error = %e, "error generating suggestions");
            Json(SuggestionsResponse::empty()).into_response()
        }
    }
}
