use http::StatusCode;
use serde::Serialize;

/// The two failure classes a caller can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Traceable to the caller's input; reported as 400
    InvalidInput,
    /// Anything else; reported as 500 without internal detail
    Internal,
}

impl ErrorClass {
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal_error",
        }
    }
}

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The router layer turns
/// these into responses, keeping domain errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// Which side of the contract failed
    fn class(&self) -> ErrorClass;

    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        self.class().status_code()
    }

    /// Machine-readable error type
    fn error_type(&self) -> &'static str {
        self.class().as_str()
    }

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// JSON body sent to the caller
    fn body(&self) -> ErrorBody {
        ErrorBody {
            detail: self.client_message(),
        }
    }
}

/// Error response body: `{"detail": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}
