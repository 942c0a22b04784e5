use linkstat_core::ShortCode;
use linkstat_shortener::HitCount;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateUrlRequest {
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct CreateUrlResponse {
    pub result: &'static str,
    pub shorturlid: ShortCode,
    pub url: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub result: &'static str,
    pub hits: HitCount,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
