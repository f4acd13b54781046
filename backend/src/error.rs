use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::classifier::InferenceError;
use crate::db::user_repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Upload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),
    #[error("Malformed upload: {0}")]
    Multipart(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Token(#[from] JwtError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn client_message(&self) -> String {
        match self {
            AppError::Repository(RepositoryError::AlreadyExists) => {
                "Username already exists".to_string()
            }
            AppError::Repository(_) => "Database error, the operation was aborted".to_string(),
            AppError::Token(_) | AppError::Password(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
            AppError::Inference(_) => "The classifier failed to process the image".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Repository(RepositoryError::AlreadyExists) => StatusCode::CONFLICT,
            AppError::Repository(_)
            | AppError::Token(_)
            | AppError::Password(_)
            | AppError::Inference(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.client_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses() {
        assert_eq!(
            AppError::Repository(RepositoryError::AlreadyExists).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::PayloadTooLarge(10).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            AppError::Repository(RepositoryError::InvalidData("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn hides_internal_details() {
        let err = AppError::Repository(RepositoryError::InvalidData("row 7".into()));
        assert!(!err.client_message().contains("row 7"));
        assert_eq!(
            AppError::Validation("Passwords do not match.".into()).client_message(),
            "Passwords do not match."
        );
    }
}
