use crate::error::AppError;
use crate::model::HealthResponse;
use axum::Json;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn home_handler() -> AppError {
    AppError::NotFound("Nothing here".to_string())
}
