use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// The whole browser UI: one page, four views, session id kept in sessionStorage.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
