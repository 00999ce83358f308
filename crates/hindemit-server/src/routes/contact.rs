use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::info;

use hindemit_core::models::contact::{ContactForm, ContactResponse};

use crate::error::ApiError;

/// Accept a contact form submission.
///
/// Nothing is stored; a valid submission is only logged.
pub async fn submit_contact(body: Bytes) -> Result<Response, ApiError> {
    let form: ContactForm = serde_json::from_slice(&body)?;

    if let Err(errors) = form.validate() {
        let response = ContactResponse {
            success: false,
            message: "Please correct the highlighted fields.".to_string(),
            errors,
        };
        return Ok((StatusCode::BAD_REQUEST, Json(response)).into_response());
    }

    info!(
        name = %form.name,
        email = %form.email,
        company = form.company.as_deref().unwrap_or(""),
        employees = form.employees.as_deref().unwrap_or(""),
        message_len = form.message.len(),
        "contact form submitted"
    );

    Ok(Json(ContactResponse {
        success: true,
        message: "Form submitted successfully!".to_string(),
        errors: Vec::new(),
    })
    .into_response())
}
