//! Drives a [`ChatSession`] against a [`ChatBackend`].
//!
//! The controller owns two background tasks at most: the running reply
//! stream and the pending suggestion timer. Starting a new one of either
//! kind aborts the previous one, and [`ChatController::stop`] and
//! [`ChatController::reset`] abort both.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use hindemit_core::models::api::{ChatStreamEvent, ConversationRequest};
use hindemit_core::models::suggestion;
use hindemit_core::session::{ChatRequest, ChatSession};

use crate::backend::ChatBackend;
use crate::error::WidgetError;

/// Delay between a finished reply and the suggestion request.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Default)]
struct Tasks {
    stream: Option<JoinHandle<()>>,
    suggestions: Option<JoinHandle<()>>,
}

struct Inner<B> {
    backend: B,
    session: Arc<Mutex<ChatSession>>,
    tasks: StdMutex<Tasks>,
    debounce: Duration,
}

pub struct ChatController<B: ChatBackend> {
    inner: Arc<Inner<B>>,
}

impl<B: ChatBackend> Clone for ChatController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: ChatBackend> ChatController<B> {
    pub fn new(backend: B) -> Self {
        Self::with_session(backend, ChatSession::default())
    }

    pub fn with_session(backend: B, session: ChatSession) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                session: Arc::new(Mutex::new(session)),
                tasks: StdMutex::new(Tasks::default()),
                debounce: SUGGESTION_DEBOUNCE,
            }),
        }
    }

    /// Shared handle to the session, for rendering.
    pub fn session(&self) -> Arc<Mutex<ChatSession>> {
        Arc::clone(&self.inner.session)
    }

    /// Copy of the current session state.
    pub async fn snapshot(&self) -> ChatSession {
        self.inner.session.lock().await.clone()
    }

    pub async fn set_input(&self, value: impl Into<String>) {
        self.inner.session.lock().await.set_input(value);
    }

    pub async fn select_model(&self, model_id: &str) -> Result<(), WidgetError> {
        self.inner.session.lock().await.select_model(model_id)?;
        Ok(())
    }

    /// Send the current input. Returns `false` when nothing was sent.
    pub async fn send(&self) -> bool {
        let request = self.inner.session.lock().await.submit();
        self.start(request)
    }

    /// Send a suggestion chip. Refused while a reply is in progress.
    pub async fn click_suggestion(&self, text: &str) -> bool {
        let request = self.inner.session.lock().await.click_suggestion(text);
        self.start(request)
    }

    fn start(&self, request: Option<ChatRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };
        let mut tasks = self.inner.tasks();
        abort(tasks.suggestions.take());
        abort(tasks.stream.take());
        let inner = Arc::clone(&self.inner);
        tasks.stream = Some(tokio::spawn(async move {
            if inner.run_stream(request).await {
                inner.schedule_suggestions();
            }
        }));
        true
    }

    /// Request suggestions for the last reply after the debounce delay,
    /// replacing any pending request.
    pub fn schedule_suggestions(&self) {
        self.inner.schedule_suggestions();
    }

    /// Wait for the running reply stream, if any, to end.
    pub async fn wait_for_reply(&self) {
        let handle = self.inner.tasks().stream.take();
        if let Some(handle) = handle {
            // A cancelled task is an expected outcome of stop/reset.
            let _ = handle.await;
        }
    }

    /// Stop the running reply and any pending suggestion request.
    pub async fn stop(&self) {
        self.inner.abort_all();
        self.inner.session.lock().await.stop();
        debug!("chat stopped");
    }

    /// Abort everything and start over with a greeting.
    pub async fn reset(&self) {
        self.inner.abort_all();
        self.inner.session.lock().await.reset();
    }

    /// Replace the starter chips with the server's list. On failure the
    /// current list is kept.
    pub async fn load_initial_suggestions(&self) -> Result<(), WidgetError> {
        let texts = self.inner.backend.initial_suggestions().await?;
        self.inner
            .session
            .lock()
            .await
            .set_initial_suggestions(suggestion::index_suggestions(texts));
        Ok(())
    }
}

impl<B: ChatBackend> Inner<B> {
    fn tasks(&self) -> std::sync::MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn abort_all(&self) {
        let mut tasks = self.tasks();
        abort(tasks.stream.take());
        abort(tasks.suggestions.take());
    }

    /// Feed one reply into the session. Returns `true` when the reply
    /// finished cleanly.
    ///
    /// Every event is applied under the session lock and only while the
    /// request's generation is current. An aborted task may still be mid-poll
    /// when the next message is sent, so this check is what keeps a
    /// superseded reply out of the session.
    async fn run_stream(&self, request: ChatRequest) -> bool {
        let epoch = request.generation;
        let body = ConversationRequest {
            messages: request.messages,
            model: Some(request.model),
        };
        let mut events = match self.backend.stream_chat(body).await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "chat request failed");
                let mut session = self.session.lock().await;
                if session.is_current(epoch) {
                    session.fail_stream(e.to_string());
                }
                return false;
            }
        };

        while let Some(event) = events.next().await {
            let mut session = self.session.lock().await;
            if !session.is_current(epoch) {
                debug!(epoch, "dropping events of a superseded reply");
                return false;
            }
            match event {
                Ok(ChatStreamEvent::Start { message_id }) => {
                    session.begin_assistant_message(message_id)
                }
                Ok(ChatStreamEvent::Delta { text }) => session.append_delta(&text),
                Ok(ChatStreamEvent::Finish) => break,
                Ok(ChatStreamEvent::Error { message }) => {
                    warn!(error = %message, "chat stream reported an error");
                    session.fail_stream(message);
                    return false;
                }
                Err(e) => {
                    warn!(error = %e, "chat stream broke");
                    session.fail_stream(e.to_string());
                    return false;
                }
            }
        }

        let mut session = self.session.lock().await;
        if !session.is_current(epoch) {
            return false;
        }
        session.finish_stream();
        true
    }

    fn schedule_suggestions(self: &Arc<Self>) {
        let inner = Arc::clone(self);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.load_suggestions().await;
        });
        let mut tasks = self.tasks();
        abort(tasks.suggestions.replace(timer));
    }

    async fn load_suggestions(&self) {
        let Some(request) = self.session.lock().await.suggestion_request() else {
            return;
        };
        let body = ConversationRequest {
            messages: request.messages,
            model: Some(request.model),
        };
        let texts = match self.backend.fetch_suggestions(body).await {
            Ok(texts) => texts,
            Err(e) => {
                warn!(error = %e, "suggestions request failed");
                Vec::new()
            }
        };
        let applied = self
            .session
            .lock()
            .await
            .apply_suggestions(request.generation, texts);
        debug!(applied, "suggestions received");
    }
}

fn abort(handle: Option<JoinHandle<()>>) {
    if let Some(handle) = handle {
        handle.abort();
    }
}
