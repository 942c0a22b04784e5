use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, StatsResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkstat_core::ShortCode;
use tracing::{debug, info};

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<CreateUrlResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "rejected create request body");
        AppError::BadRequest(rejection.body_text())
    })?;
    let url = request
        .url
        .ok_or_else(|| AppError::BadRequest("missing field `url`".to_string()))?;

    let created = state.shortener().create_short_url(&url).await?;

    Ok(Json(CreateUrlResponse {
        result: "added",
        shorturlid: created.short_code,
        url: created.long_url,
    }))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new_unchecked(&short_code);
    let resolution = state.shortener().resolve(&code).await?;

    info!(code = %code, url = %resolution.long_url, "Redirecting");
    let location = HeaderValue::try_from(resolution.long_url.as_str()).map_err(|e| {
        AppError::Internal(format!("stored url for {code} is not a valid header: {e}"))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

pub async fn stats_handler(
    Path((short_code, period)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>> {
    let code = ShortCode::new_unchecked(&short_code);
    info!(code = %code, period = %period, "Getting stats");

    let hits = state.shortener().get_hit_count(&code, &period).await?;

    Ok(Json(StatsResponse { result: "ok", hits }))
}
