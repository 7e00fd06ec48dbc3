//! In-process stand-ins for the storefront and the search API.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;

pub const STORE_HTML: &str = r#"<html>
<head><title>Acme Outfitters</title></head>
<body>
  <a href="/policies/privacy-policy">Privacy Policy</a>
  <a href="/pages/faq">FAQ</a>
  <a href="/products/trail-shoe">Trail Shoe</a>
  <a href="https://instagram.com/acme">Instagram</a>
  <p>Email hello@acme.com</p>
</body>
</html>"#;

pub const STORE_FEED: &str = r#"{"products":[
  {"title":"Shirt","variants":[{"price":"19.99"}],"handle":"shirt"},
  {"title":"Cap","variants":[{"price":7}],"handle":"cap"}
]}"#;

pub const SLOW_FEED: &str = r#"{"products":[]}"#;

pub const BLANK_HTML: &str = "<html><head></head><body><p>Nothing here.</p></body></html>";

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn storefront_router() -> Router {
    Router::new()
        .route("/", get(|| async { axum::response::Html(STORE_HTML) }))
        .route("/products.json", get(|| async { STORE_FEED }))
}

/// A page with nothing extractable and no feed.
pub fn blank_router() -> Router {
    Router::new().route("/", get(|| async { axum::response::Html(BLANK_HTML) }))
}

/// SerpAPI lookalike. The first organic result echoes the query as
/// `q:<query>`, the second has no link, then one result per entry in `links`.
pub fn search_router(links: Vec<&'static str>) -> Router {
    Router::new().route(
        "/search.json",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let links = links.clone();
            async move {
                if params.get("api_key").map(String::as_str) != Some("test-key") {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "error": "Invalid API key." })),
                    );
                }
                let q = params.get("q").cloned().unwrap_or_default();
                let mut results: Vec<Value> = vec![
                    json!({ "position": 1, "link": format!("q:{}", q) }),
                    json!({ "position": 2, "title": "no link here" }),
                ];
                results.extend(links.iter().map(|l| json!({ "title": "x", "link": l })));
                (StatusCode::OK, Json(json!({ "organic_results": results })))
            }
        }),
    )
}
