use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// The chat widget page. Served regardless of provider configuration.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
