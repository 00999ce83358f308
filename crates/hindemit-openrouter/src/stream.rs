//! Turn a streamed completion body into text deltas.

use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use hindemit_core::sse::SseDecoder;

use crate::error::ProviderError;
use crate::wire::CompletionChunk;

/// Sentinel payload that ends an OpenAI-compatible stream.
const DONE: &str = "[DONE]";

/// Decode a completion byte stream into non-empty text deltas.
///
/// Ends at `[DONE]` or when the body ends. An `error` object inside the
/// stream is yielded as an error and ends the stream.
pub fn delta_stream<S, E>(byte_stream: S) -> impl Stream<Item = Result<String, ProviderError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<ProviderError>,
{
    struct State<S> {
        bytes: Pin<Box<S>>,
        decoder: SseDecoder,
        done: bool,
    }

    let state = State {
        bytes: Box::pin(byte_stream),
        decoder: SseDecoder::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.done {
                return None;
            }

            let frame = match state.decoder.next_frame() {
                Ok(Some(frame)) => Some(frame),
                Ok(None) => match state.bytes.next().await {
                    Some(Ok(chunk)) => {
                        state.decoder.push(&chunk);
                        continue;
                    }
                    Some(Err(e)) => {
                        state.done = true;
                        return Some((Err(e.into()), state));
                    }
                    None => {
                        state.done = true;
                        match state.decoder.finish() {
                            Ok(frame) => frame,
                            Err(e) => return Some((Err(e.into()), state)),
                        }
                    }
                },
                Err(e) => {
                    state.done = true;
                    return Some((Err(e.into()), state));
                }
            };

            let Some(frame) = frame else {
                return None;
            };
            let data = frame.data.trim();
            if data == DONE {
                debug!("completion stream finished");
                state.done = true;
                return None;
            }

            let chunk: CompletionChunk = match serde_json::from_str(data) {
                Ok(chunk) => chunk,
                Err(e) => {
                    state.done = true;
                    return Some((
                        Err(ProviderError::ResponseParse(format!(
                            "malformed stream chunk: {e}"
                        ))),
                        state,
                    ));
                }
            };
            if let Some(error) = chunk.error {
                state.done = true;
                return Some((Err(ProviderError::Stream(error.message)), state));
            }

            if let Some(reason) = chunk.finish_reason() {
                debug!(reason, "completion stream reported finish");
            }
            let text = chunk.text();
            if !text.is_empty() {
                return Some((Ok(text), state));
            }
        }
    })
}
