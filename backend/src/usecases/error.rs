use axum::http::StatusCode;
use thiserror::Error;

/// Client-visible failure taxonomy. Every variant aborts the enclosing
/// operation; nothing here is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("an offer cannot be appointed to its own owner")]
    SelfAppointedOffer,

    #[error("{0}")]
    Forbidden(String),

    #[error("switch your account to the master role to perform this action")]
    MasterRoleRequired,

    #[error("user not found")]
    UserDoesNotExist,

    #[error("{0} not found")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::SelfAppointedOffer => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) | ApiError::MasterRoleRequired => StatusCode::FORBIDDEN,
            ApiError::UserDoesNotExist | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
