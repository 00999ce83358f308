//! Contact form submitted from the widget page.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

const MIN_MESSAGE_CHARS: usize = 10;
const MAX_FIELD_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub employees: Option<String>,
    pub message: String,
    #[serde(default)]
    pub agree: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ContactForm {
    /// Check every field and collect all problems at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut fail = |field: &str, message: &str| {
            errors.push(FieldError {
                field: field.to_string(),
                message: message.to_string(),
            });
        };

        if self.name.trim().is_empty() {
            fail("name", "name is required");
        }
        if !looks_like_email(self.email.trim()) {
            fail("email", "a valid email address is required");
        }
        let message_len = self.message.trim().chars().count();
        if message_len < MIN_MESSAGE_CHARS {
            fail("message", "message must be at least 10 characters");
        }
        for (field, value) in [
            ("name", Some(&self.name)),
            ("company", self.company.as_ref()),
            ("message", Some(&self.message)),
        ] {
            if value.is_some_and(|v| v.chars().count() > MAX_FIELD_CHARS) {
                fail(field, "value is too long");
            }
        }
        if !self.agree {
            fail("agree", "the privacy policy must be accepted");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}
