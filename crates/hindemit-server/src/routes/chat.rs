use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use hindemit_core::models::api::{ChatStreamEvent, ConversationRequest};
use hindemit_core::models::catalog::resolve_model;
use hindemit_openrouter::error::ProviderError;
use hindemit_openrouter::provider::DeltaStream;

use crate::error::ApiError;
use crate::state::AppState;

/// Stream an assistant reply to the conversation as server-sent events.
///
/// Validation and the upstream connection happen before the response
/// starts, so those failures are plain JSON errors. Failures after that
/// arrive as a final `error` event.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: ConversationRequest = serde_json::from_slice(&body)?;
    let model = resolve_model(request.model.as_deref())?;
    let provider = state
        .provider
        .as_deref()
        .ok_or(ProviderError::MissingApiKey)?;

    if request.messages.is_empty() {
        return Err(ApiError::BadRequest("conversation has no messages".to_string()));
    }

    let deltas = provider
        .stream_chat(model.id, &state.chat_system_prompt, &request.messages)
        .await?;

    let message_id = Uuid::new_v4().to_string();
    info!(model = model.id, message_id = %message_id, "chat stream started");

    Ok(Sse::new(reply_events(message_id, deltas))
        .keep_alive(KeepAlive::default())
        .into_response())
}

fn reply_events(
    message_id: String,
    deltas: DeltaStream,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let start = stream::once(async move { ChatStreamEvent::Start { message_id } });

    let rest = stream::unfold(Some(deltas), |deltas| async move {
        let mut deltas = deltas?;
        match deltas.next().await {
            Some(Ok(text)) => Some((ChatStreamEvent::Delta { text }, Some(deltas))),
            Some(Err(e)) => {
                warn!(error = %e, "chat stream failed");
                let message = e.to_string();
                Some((ChatStreamEvent::Error { message }, None))
            }
            None => Some((ChatStreamEvent::Finish, None)),
        }
    });

    start.chain(rest).map(|event| Ok(to_sse_event(&event)))
}

fn to_sse_event(event: &ChatStreamEvent) -> Event {
    Event::default()
        .event(event.event_name())
        .data(event.data().to_string())
}
