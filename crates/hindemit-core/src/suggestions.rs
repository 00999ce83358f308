//! Best-effort parsing of the model's follow-up question reply.
//!
//! The model is asked for a JSON array of strings. Models often wrap it in a
//! Markdown code fence or ignore the format entirely, so parsing falls back
//! to treating each non-blank line as one question.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Upper bound on suggestions returned to the widget.
pub const MAX_SUGGESTIONS: usize = 5;

/// Fallback lines must be shorter than this, counted in UTF-16 code units
/// so the cap matches what a browser reports as the string's length.
pub const MAX_FALLBACK_LINE_UNITS: usize = 100;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n?").expect("static regex"));
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\n?").expect("static regex"));
static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•]\s*").expect("static regex"));
static LEADING_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"\s*"#).expect("static regex"));
static TRAILING_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s*"$"#).expect("static regex"));

/// Parse a raw model reply into at most [`MAX_SUGGESTIONS`] questions.
pub fn parse_suggestions(raw: &str) -> Vec<String> {
    match parse_json_array(raw) {
        Ok(suggestions) => suggestions,
        Err(reason) => {
            warn!(reason = %reason, raw_len = raw.len(), "suggestion reply is not a JSON array, splitting lines");
            parse_lines(raw)
        }
    }
}

fn strip_code_fences(raw: &str) -> String {
    let without_json = JSON_FENCE.replace_all(raw.trim(), "");
    FENCE.replace_all(&without_json, "").into_owned()
}

fn parse_json_array(raw: &str) -> Result<Vec<String>, String> {
    let cleaned = strip_code_fences(raw);
    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| e.to_string())?;
    let serde_json::Value::Array(items) = value else {
        return Err("response is not an array".to_string());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .take(MAX_SUGGESTIONS)
        .collect())
}

fn parse_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(clean_line)
        .filter(|line| {
            let len = line.encode_utf16().count();
            len > 0 && len < MAX_FALLBACK_LINE_UNITS
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn clean_line(line: &str) -> String {
    let line = LEADING_BULLET.replace(line, "");
    let line = LEADING_QUOTE.replace(&line, "");
    let line = TRAILING_QUOTE.replace(&line, "");
    line.trim().to_string()
}
