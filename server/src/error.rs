//! Handler error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recipi_core::{ErrorResponse, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body failed field validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    /// Authenticated, but not allowed to touch this resource.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl ApiError {
    /// Turn a unique-constraint violation into a 409 with `message`; other
    /// database errors pass through unchanged.
    pub fn conflict_on_unique(err: diesel::result::Error, message: &str) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => ApiError::Conflict(message.to_string()),
            other => ApiError::Database(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => ErrorResponse {
                error: "Validation failed".to_string(),
                details: errors.messages().to_vec(),
            },
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => {
                ErrorResponse::new("Internal server error")
            }
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_carries_details() {
        let errors = ValidationErrors(vec!["tags should not be empty".to_string()]);
        let err = ApiError::from(errors);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert_eq!(body.error, "Validation failed");
        assert_eq!(body.details, vec!["tags should not be empty"]);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::Internal("disk on fire".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body(), ErrorResponse::new("Internal server error"));
    }

    #[test]
    fn test_other_database_errors_not_conflicts() {
        let err = ApiError::conflict_on_unique(diesel::result::Error::NotFound, "taken");
        assert!(matches!(err, ApiError::Database(_)));
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = ApiError::Forbidden("You do not own this recipe".to_string());
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.body().error, "You do not own this recipe");
    }
}
