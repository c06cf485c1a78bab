use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by calls against the employee API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or transport failure, the request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 400
    #[error("validation failed: {0}")]
    Validation(String),

    /// HTTP 409, duplicate email or duplicate access grant
    #[error("conflict: {0}")]
    Conflict(String),

    /// HTTP 404
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Body could not be decoded into the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ClientError::Validation(body),
            StatusCode::CONFLICT => ClientError::Conflict(body),
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            _ => ClientError::Status { status, body },
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
