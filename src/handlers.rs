use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::db::StoredBrand;
use crate::error::InsightsError;
use crate::models::BrandResponse;
use crate::pipeline::Insights;

#[derive(Deserialize)]
pub struct FetchParams {
    pub website_url: String,
}

pub fn router(insights: Arc<Insights>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/fetch_brand_insights", get(fetch_brand_insights))
        .route("/brands/:id", get(get_brand))
        .layer(TraceLayer::new_for_http())
        .with_state(insights)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Shopify Insights API is running" }))
}

async fn fetch_brand_insights(
    State(insights): State<Arc<Insights>>,
    Query(params): Query<FetchParams>,
) -> Result<Json<BrandResponse>, InsightsError> {
    insights
        .fetch_brand_insights(&params.website_url)
        .await
        .map(Json)
}

async fn get_brand(
    State(insights): State<Arc<Insights>>,
    Path(id): Path<i64>,
) -> Result<Json<StoredBrand>, InsightsError> {
    insights.stored_brand(id).await.map(Json)
}
