//! The fixed catalog of selectable provider/model pairs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A selectable chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Model {
    /// Provider-qualified model id, e.g. `google/gemini-2.5-flash-lite`.
    pub id: &'static str,
    /// Human-readable name shown in the model picker.
    pub name: &'static str,
}

pub const DEFAULT_MODEL_ID: &str = "google/gemini-2.5-flash-lite";

pub const MODELS: &[Model] = &[
    Model {
        id: DEFAULT_MODEL_ID,
        name: "Gemini 2.5 Flash",
    },
    Model {
        id: "openai/gpt-5-nano",
        name: "GPT-5 Nano",
    },
    Model {
        id: "x-ai/grok-4.1-fast",
        name: "Grok 4.1 Fast",
    },
];

pub fn find_model(id: &str) -> Option<&'static Model> {
    MODELS.iter().find(|m| m.id == id)
}

/// Resolve an optional requested model id against the catalog.
///
/// `None` (or an empty string) selects the default model.
pub fn resolve_model(requested: Option<&str>) -> Result<&'static Model, CoreError> {
    match requested.filter(|id| !id.is_empty()) {
        None => Ok(&MODELS[0]),
        Some(id) => find_model(id).ok_or_else(|| CoreError::UnknownModel(id.to_string())),
    }
}

/// Owned form of the catalog for the `/api/models` response.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ModelCatalog {
    pub models: Vec<ModelEntry>,
    pub default_model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelEntry {
    pub id: String,
    pub name: String,
}

impl ModelCatalog {
    pub fn current() -> Self {
        Self {
            models: MODELS
                .iter()
                .map(|m| ModelEntry {
                    id: m.id.to_string(),
                    name: m.name.to_string(),
                })
                .collect(),
            default_model: DEFAULT_MODEL_ID.to_string(),
        }
    }
}
