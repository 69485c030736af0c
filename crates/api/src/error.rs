//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use stowage_core::upload::UploadError;
use stowage_shared::AppError;

/// Error rendered as `{"error": message}` with the status of the wrapped [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// A 400 for missing or invalid request fields.
    #[must_use]
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation("filename is required".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Authentication("missing_secret".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::ExternalService("503".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[tokio::test]
    async fn test_error_response(#[case] err: AppError, #[case] expected: StatusCode) {
        let message = err.message().to_string();
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), expected);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": message }));
    }
}
