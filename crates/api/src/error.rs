//! Mapping of domain errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::auth::CredentialError;
use tally_core::budget::BudgetError;
use tally_core::day_shift::UnknownShiftDirection;
use tally_core::store::StoreError;
use tally_shared::{AppError, JwtError};
use tracing::error;

/// Handler error carrying an [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(detail) => Self(AppError::Conflict(detail)),
            StoreError::Backend(detail) => {
                error!(error = %detail, "storage backend failed");
                Self(AppError::Database("An error occurred".to_string()))
            }
        }
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<UnknownShiftDirection> for ApiError {
    fn from(err: UnknownShiftDirection) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        if err.is_rejection() {
            return Self(AppError::Validation(err.to_string()));
        }
        error!(error = %err, "credential check failed");
        Self(AppError::Internal("An error occurred".to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        error!(error = %err, "token generation failed");
        Self(AppError::Internal("An error occurred".to_string()))
    }
}

/// Shorthand for a 404 with `what` in the message.
pub fn not_found(what: &str) -> ApiError {
    ApiError(AppError::NotFound(format!("{what} not found")))
}

/// Shorthand for a 401.
pub fn unauthorized(message: &str) -> ApiError {
    ApiError(AppError::Unauthorized(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let response = ApiError::from(BudgetError::ZeroLimit).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Budget limit must not be zero");
    }

    #[tokio::test]
    async fn test_backend_error_hides_detail() {
        let response =
            ApiError::from(StoreError::Backend("connection refused".into())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_conflict_maps_to_409() {
        let response = ApiError::from(StoreError::Conflict("dup".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_credential_errors() {
        let response = ApiError::from(CredentialError::MissingPassword).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Password is required");

        let response = ApiError::from(CredentialError::CorruptHash).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "An error occurred");
    }
}
