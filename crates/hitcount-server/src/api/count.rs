//! Counting endpoints.
//!
//! `POST /count` is canonical and reads the referrer from the JSON body.
//! `GET /count` reads the `Referer` header; it is kept for existing clients
//! and marks its responses with `Deprecation: true`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};

use hitcount_core::error::HitCountError;
use hitcount_core::{HitRequest, HitResponse, Welcome};

use super::ApiError;
use crate::app_state::AppState;

pub async fn welcome() -> Json<Welcome> {
    Json(Welcome::default())
}

pub async fn count_from_body(
    State(state): State<AppState>,
    body: Result<Json<HitRequest>, JsonRejection>,
) -> Result<Json<HitResponse>, ApiError> {
    let Json(req) = body.map_err(|e| HitCountError::BadRequest(e.body_text()))?;
    let res = state.counter().record_hit(req.referrer()).await?;
    Ok(Json(res))
}

pub async fn count_from_header(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let referrer = referer_header(&headers)?;
    let res = state.counter().record_hit(referrer).await?;
    Ok(([("deprecation", "true")], Json(res)))
}

/// `Referer` as UTF-8, `None` when the header is missing.
fn referer_header(headers: &HeaderMap) -> Result<Option<&str>, HitCountError> {
    let Some(value) = headers.get(header::REFERER) else {
        return Ok(None);
    };
    std::str::from_utf8(value.as_bytes())
        .map(Some)
        .map_err(|_| HitCountError::BadRequest("referer header is not valid utf-8".into()))
}
