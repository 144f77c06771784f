use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hitcount_core::error::{ClientCode, HitCountError};

/// HTTP face of `HitCountError`.
#[derive(Debug)]
pub struct ApiError(pub HitCountError);

impl From<HitCountError> for ApiError {
    fn from(e: HitCountError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = match code {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::Storage | ClientCode::Config | ClientCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = if self.0.is_client_visible() {
            self.0.to_string()
        } else {
            "internal server error".to_string()
        };
        let body = Json(json!({
            "error": code.as_str(),
            "message": message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_become_500_without_detail() {
        let res = ApiError(HitCountError::Storage("mongodb://secret@host down".into())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_becomes_400() {
        let res = ApiError(HitCountError::BadRequest("nope".into())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
