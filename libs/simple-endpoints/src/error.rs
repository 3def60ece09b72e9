use http::StatusCode;
use simple_encoding::{ContentTypeError, DecodeError, EncodeError};
use thiserror::Error;

/// Everything that can go wrong once a request has been matched to an endpoint.
///
/// Route mismatches are not errors: [`Router::run`](crate::Router::run) returns
/// `Ok(None)` for those.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Invalid {header} header: {source}")]
    InvalidHeader {
        header: &'static str,
        #[source]
        source: ContentTypeError,
    },

    /// Raised by handler code with a client-facing status.
    #[error("{message}")]
    Handler {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EndpointError {
    pub fn handler(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    /// HTTP status the transport should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(err) if err.is_negotiation_failure() => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Encode(EncodeError::Json(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Encode(_) => StatusCode::NOT_ACCEPTABLE,
            Self::InvalidHeader { .. } => StatusCode::BAD_REQUEST,
            Self::Handler { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &str {
        match self {
            Self::Decode(err) if err.is_negotiation_failure() => "unsupported_content_type",
            Self::Decode(DecodeError::InvalidJson(_)) => "invalid_json",
            Self::Decode(_) => "invalid_data",
            Self::Encode(EncodeError::Json(_)) => "internal",
            Self::Encode(EncodeError::Structure(_)) => "version_mismatch",
            Self::Encode(_) => "not_acceptable",
            Self::InvalidHeader { .. } => "invalid_header",
            Self::Handler { code, .. } => code,
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the caller caused the failure.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}
