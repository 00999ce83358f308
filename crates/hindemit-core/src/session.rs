//! Chat widget session state.
//!
//! [`ChatSession`] is the single owner of everything the widget renders:
//! the message list, the input box, the selected model, the chat status and
//! the suggestion chips. It is a plain state machine. Network calls and
//! timers live in the widget crate, which feeds results back through the
//! methods here.
//!
//! # Suggestion cycle
//!
//! After a reply finishes streaming, the controller asks
//! [`ChatSession::suggestion_request`] whether a fetch is due. Each request
//! carries the current *generation*. Sending a message, stopping, or
//! resetting bumps the generation, so a response that arrives for an older
//! generation is dropped by [`ChatSession::apply_suggestions`] instead of
//! overwriting newer state.

use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;
use crate::models::catalog::{self, DEFAULT_MODEL_ID};
use crate::models::message::{self, Message, Role};
use crate::models::suggestion::{self, Suggestion};

/// Greeting shown as the first assistant message of every session.
pub const GREETING: &str = "Hallo! Ich bin dein AI-Assistent. Wie kann ich dir helfen?";

/// Status of the chat stream, as reported by the chat transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    Ready,
    Submitted,
    Streaming,
    Error,
}

/// What the controller must POST to `/api/chat`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Session generation the reply belongs to. Stream events must only be
    /// applied while [`ChatSession::is_current`] holds for it.
    pub generation: u64,
    pub messages: Vec<Message>,
    pub model: String,
}

/// What the controller must POST to `/api/suggestions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRequest {
    pub generation: u64,
    pub messages: Vec<Message>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    selected_model: String,
    status: ChatStatus,
    last_error: Option<String>,
    typing: bool,
    chat_is_stopped: bool,
    initial_suggestions: Vec<Suggestion>,
    suggestions: Vec<Suggestion>,
    suggestions_loading: bool,
    suggestions_stopped: bool,
    generation: u64,
    /// Id of the assistant message the last suggestion request was for.
    suggested_for: Option<String>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(suggestion::initial_suggestions())
    }
}

impl ChatSession {
    pub fn new(initial_suggestions: Vec<Suggestion>) -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
            input: String::new(),
            selected_model: DEFAULT_MODEL_ID.to_string(),
            status: ChatStatus::Ready,
            last_error: None,
            typing: false,
            chat_is_stopped: false,
            initial_suggestions,
            suggestions: Vec::new(),
            suggestions_loading: false,
            suggestions_stopped: false,
            generation: 0,
            suggested_for: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn chat_is_stopped(&self) -> bool {
        self.chat_is_stopped
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn initial_suggestions(&self) -> &[Suggestion] {
        &self.initial_suggestions
    }

    pub fn is_loading_suggestions(&self) -> bool {
        self.suggestions_loading
    }

    pub fn suggestions_stopped(&self) -> bool {
        self.suggestions_stopped
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// No send, stop or reset happened since `generation` was handed out.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn has_user_messages(&self) -> bool {
        message::has_user_messages(&self.messages)
    }

    /// A reply is pending, streaming, or still being typed out.
    pub fn is_chat_in_progress(&self) -> bool {
        matches!(self.status, ChatStatus::Submitted | ChatStatus::Streaming) || self.typing
    }

    /// Chips to render: the generated ones once the user has written
    /// something and some exist, the starter list otherwise.
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        if self.has_user_messages() && !self.suggestions.is_empty() {
            &self.suggestions
        } else {
            &self.initial_suggestions
        }
    }

    pub fn suggestions_disabled(&self) -> bool {
        (self.suggestions_loading || self.is_chat_in_progress()) && !self.suggestions_stopped
    }

    // ── Input and selection ─────────────────────────────────────────────

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Select a model from the catalog.
    pub fn select_model(&mut self, model_id: &str) -> Result<(), CoreError> {
        let model = catalog::find_model(model_id)
            .ok_or_else(|| CoreError::UnknownModel(model_id.to_string()))?;
        self.selected_model = model.id.to_string();
        Ok(())
    }

    /// The typewriter effect is still revealing the last reply.
    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub fn set_initial_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.initial_suggestions = suggestions;
    }

    // ── Sending ─────────────────────────────────────────────────────────

    /// Send the current input. Returns `None` when the input is blank.
    pub fn submit(&mut self) -> Option<ChatRequest> {
        self.chat_is_stopped = false;
        if self.input.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        Some(self.send_text(text))
    }

    /// Send a suggestion chip's text. Refused while a reply is in progress.
    pub fn click_suggestion(&mut self, text: &str) -> Option<ChatRequest> {
        self.chat_is_stopped = false;
        if text.trim().is_empty() || self.is_chat_in_progress() {
            return None;
        }
        Some(self.send_text(text.to_string()))
    }

    fn send_text(&mut self, text: String) -> ChatRequest {
        self.clear_suggestions();
        self.messages.push(Message::user(text));
        self.status = ChatStatus::Submitted;
        self.last_error = None;
        debug!(
            messages = self.messages.len(),
            model = %self.selected_model,
            "chat request submitted"
        );
        ChatRequest {
            generation: self.generation,
            messages: self.messages.clone(),
            model: self.selected_model.clone(),
        }
    }

    // ── Streaming ───────────────────────────────────────────────────────

    /// The server opened the reply stream and named the reply's id.
    pub fn begin_assistant_message(&mut self, id: impl Into<String>) {
        let mut reply = Message::assistant("");
        reply.id = id.into();
        self.messages.push(reply);
        self.status = ChatStatus::Streaming;
    }

    /// Append streamed text to the reply. A delta that arrives before
    /// [`begin_assistant_message`](Self::begin_assistant_message) starts a
    /// reply with a generated id.
    pub fn append_delta(&mut self, delta: &str) {
        if self.status != ChatStatus::Streaming
            || self.messages.last().is_none_or(|m| m.role != Role::Assistant)
        {
            self.messages.push(Message::assistant(""));
            self.status = ChatStatus::Streaming;
        }
        if let Some(last) = self.messages.last_mut() {
            last.push_text(delta);
        }
    }

    pub fn finish_stream(&mut self) {
        self.status = ChatStatus::Ready;
    }

    pub fn fail_stream(&mut self, reason: impl Into<String>) {
        self.status = ChatStatus::Error;
        self.last_error = Some(reason.into());
    }

    // ── Stop and reset ──────────────────────────────────────────────────

    /// Stop the running reply and any pending suggestion fetch.
    pub fn stop(&mut self) {
        if matches!(self.status, ChatStatus::Submitted | ChatStatus::Streaming) {
            self.status = ChatStatus::Ready;
        }
        self.typing = false;
        self.suggestions_stopped = true;
        self.suggestions_loading = false;
        self.generation += 1;
        self.chat_is_stopped = true;
    }

    /// Start over with a single greeting.
    pub fn reset(&mut self) {
        self.messages = vec![Message::assistant(GREETING)];
        self.input.clear();
        self.status = ChatStatus::Ready;
        self.last_error = None;
        self.typing = false;
        self.chat_is_stopped = false;
        self.clear_suggestions();
        self.suggested_for = None;
        debug!("chat session reset");
    }

    // ── Suggestions ─────────────────────────────────────────────────────

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestions_loading = false;
        self.suggestions_stopped = false;
        self.generation += 1;
    }

    /// Decide whether follow-up suggestions should be fetched now.
    ///
    /// Marks the session as loading and returns the request when the last
    /// message is a finished assistant reply with text that has not been
    /// asked about yet.
    pub fn suggestion_request(&mut self) -> Option<SuggestionRequest> {
        if self.suggestions_stopped
            || matches!(self.status, ChatStatus::Submitted | ChatStatus::Streaming)
        {
            return None;
        }
        let last = self.messages.last()?;
        if last.role != Role::Assistant {
            self.suggestions.clear();
            return None;
        }
        if last.text().trim().is_empty()
            || !self.has_user_messages()
            || self.suggested_for.as_deref() == Some(last.id.as_str())
        {
            return None;
        }

        self.suggested_for = Some(last.id.clone());
        self.suggestions_loading = true;
        Some(SuggestionRequest {
            generation: self.generation,
            messages: self.messages.clone(),
            model: self.selected_model.clone(),
        })
    }

    /// Store fetched suggestions. Returns `false` and leaves state untouched
    /// when the response belongs to a superseded generation.
    pub fn apply_suggestions(&mut self, generation: u64, texts: Vec<String>) -> bool {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "dropping stale suggestions"
            );
            return false;
        }
        self.suggestions = suggestion::index_suggestions(texts);
        self.suggestions_loading = false;
        true
    }
}
