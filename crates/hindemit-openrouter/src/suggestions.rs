//! Follow-up question generation.

use tracing::info;

use hindemit_core::models::catalog::DEFAULT_MODEL_ID;
use hindemit_core::models::message::Message;
use hindemit_core::suggestions::parse_suggestions;

use crate::error::ProviderError;
use crate::provider::ChatProvider;

pub const SUGGESTIONS_SYSTEM_PROMPT: &str = "\
Du bist ein Assistent, der relevante Folgefragen generiert. 
Basierend auf der aktuellen Konversation und der letzten Antwort des Assistenten, \
generiere 3-5 kurze, präzise Folgefragen, die der Benutzer als Nächstes stellen könnte.

Die Fragen sollten:
- Direkt auf die letzte Antwort Bezug nehmen
- Kurz und prägnant sein (max. 10 Wörter)
- Natürlich und konversationell formuliert sein
- Auf Deutsch sein (außer der Benutzer kommuniziert auf einer anderen Sprache)

Antworte NUR mit einem JSON-Array von Frage-Strings, ohne zusätzlichen Text oder Erklärungen.
Beispiel-Format: [\"Frage 1?\", \"Frage 2?\", \"Frage 3?\"]";

/// Closing instruction appended after the conversation.
pub const SUGGESTIONS_INSTRUCTION: &str = "Generiere basierend auf der letzten Antwort des \
Assistenten 3-5 relevante Folgefragen als JSON-Array.";

/// Ask the provider for follow-up questions to the conversation.
///
/// `model` defaults to [`DEFAULT_MODEL_ID`]. The reply is parsed with
/// [`parse_suggestions`], so a malformed reply degrades to line splitting
/// rather than an error; only transport and provider failures are errors.
pub async fn generate_suggestions(
    provider: &dyn ChatProvider,
    messages: &[Message],
    model: Option<&str>,
) -> Result<Vec<String>, ProviderError> {
    let model = model.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MODEL_ID);

    let mut conversation = messages.to_vec();
    conversation.push(Message::user(SUGGESTIONS_INSTRUCTION));

    let reply = provider
        .generate_text(model, SUGGESTIONS_SYSTEM_PROMPT, &conversation)
        .await?;
    let suggestions = parse_suggestions(&reply);

    info!(model, count = suggestions.len(), "generated suggestions");
    Ok(suggestions)
}
