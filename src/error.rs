use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("Website not found or not a Shopify store")]
    NotAStorefront,
    #[error("Brand {0} not found")]
    BrandNotFound(i64),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl InsightsError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAStorefront => StatusCode::UNAUTHORIZED,
            Self::BrandNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InsightsError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
