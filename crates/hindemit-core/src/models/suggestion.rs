use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A follow-up question offered as a clickable chip.
///
/// `index` is the position in the list; the widget uses it to stagger the
/// entrance animation and as the list key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Suggestion {
    pub index: usize,
    pub text: String,
}

/// Starter questions shown before the user has written anything.
pub const INITIAL_SUGGESTIONS: &[&str] = &[
    "Was kannst du alles?",
    "Wie funktioniert Hindemit AI?",
    "Welche Modelle stehen zur Auswahl?",
    "Erzähl mir etwas Interessantes",
];

/// Attach list positions to plain suggestion strings.
pub fn index_suggestions<I, S>(texts: I) -> Vec<Suggestion>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Suggestion {
            index,
            text: text.into(),
        })
        .collect()
}

pub fn initial_suggestions() -> Vec<Suggestion> {
    index_suggestions(INITIAL_SUGGESTIONS.iter().copied())
}
