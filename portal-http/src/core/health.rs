use crate::core::response::HealthResponse;
use axum::response::IntoResponse;

pub async fn health_check() -> impl IntoResponse {
    tracing::debug!("Health check requested");
    HealthResponse::healthy()
}
