use reqwest::StatusCode;

/// Failures raised by an [`AccessHandler`](crate::handler::AccessHandler):
/// transport problems, unencodable requests, non-success API responses, and
/// undecodable payloads.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("HTTP transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid access API request: {0}")]
    InvalidRequest(String),

    #[error("access API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid access API response: {0}")]
    InvalidResponse(String),

    #[error("invalid access API url `{0}`")]
    InvalidUrl(String),

    #[error("request cancelled")]
    Cancelled,
}

/// A wire record or domain value that does not fit the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ConversionError {
    pub field: String,
    pub reason: String,
}

impl ConversionError {
    pub fn new(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
