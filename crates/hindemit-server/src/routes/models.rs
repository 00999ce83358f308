use axum::Json;

use hindemit_core::models::catalog::ModelCatalog;

/// The fixed model catalog for the model picker.
pub async fn list_models() -> Json<ModelCatalog> {
    Json(ModelCatalog::current())
}
