use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::main_lib::AppState;

/// Path prefixes crawlers are asked to skip.
pub const DISALLOWED_PATHS: &[&str] = &["/api/", "/settings/", "/watchlist/", "/alerts/"];

fn robots_body(public_url: &str) -> String {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    for path in DISALLOWED_PATHS {
        body.push_str("Disallow: ");
        body.push_str(path);
        body.push('\n');
    }
    body.push_str(&format!("\nSitemap: {}/sitemap.xml\n", public_url));
    body
}

pub async fn robots_txt(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_body(&state.public_url),
    )
}
