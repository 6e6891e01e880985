use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use game_core::{ErrorCode, Reply, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("{}", .0.default_message())]
    Rejected(ErrorCode),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("no free room codes")]
    CodesExhausted,
}

impl From<ValidationError> for RelayError {
    fn from(e: ValidationError) -> Self {
        RelayError::Invalid(e.to_string())
    }
}

impl RelayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::Rejected(code) => *code,
            RelayError::Invalid(_) | RelayError::CodesExhausted => ErrorCode::InvalidRequest,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Rejected(ErrorCode::RoomNotFound) => StatusCode::NOT_FOUND,
            RelayError::Rejected(ErrorCode::NotHost | ErrorCode::NotInRoom) => StatusCode::FORBIDDEN,
            RelayError::Rejected(
                ErrorCode::RoomFull | ErrorCode::NoGuest | ErrorCode::GameNotStarted,
            ) => StatusCode::CONFLICT,
            RelayError::Rejected(ErrorCode::InvalidRequest) | RelayError::Invalid(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::CodesExhausted => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn to_reply(&self) -> Reply {
        Reply::Error {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<ErrorCode> for RelayError {
    fn from(code: ErrorCode) -> Self {
        RelayError::Rejected(code)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_reply())).into_response()
    }
}
