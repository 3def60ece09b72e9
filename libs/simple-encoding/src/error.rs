use thiserror::Error;

/// Errors raised while parsing a `Content-Type` or `Accept` header value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentTypeError {
    #[error("empty content type")]
    Empty,

    #[error("invalid content type parameter '{segment}': expected key=value")]
    MissingEquals { segment: String },
}

/// Errors raised while turning parsed JSON into typed values.
///
/// Paths use a JSONPath-like notation rooted at `$` (`$.records[0].name`).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Field {field} expected")]
    FieldExpected { field: String, path: String },

    #[error("Index {index} expected at {path}")]
    IndexExpected { index: usize, path: String },

    #[error("Expected {expected} at {path}")]
    TypeMismatch {
        expected: &'static str,
        path: String,
    },

    #[error("Unknown value '{value}' at {path}, expected one of: {}", .allowed.join(", "))]
    UnknownValue {
        value: String,
        allowed: Vec<String>,
        path: String,
    },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Could not decode JSON to contentType {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("Missing Content-Type")]
    MissingContentType,

    #[error(transparent)]
    ContentType(#[from] ContentTypeError),
}

impl DecodeError {
    pub fn type_mismatch(expected: &'static str, path: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            path: path.into(),
        }
    }

    /// Location of the failure inside the decoded tree, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FieldExpected { path, .. }
            | Self::IndexExpected { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::UnknownValue { path, .. } => Some(path),
            _ => None,
        }
    }

    /// True when no registered decoder accepts the request's content type.
    pub fn is_negotiation_failure(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedContentType { .. } | Self::MissingContentType
        )
    }
}

/// Errors raised on the output path.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Could not encode content to contentType {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("Value does not fit the negotiated version: {0}")]
    Structure(#[from] DecodeError),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl EncodeError {
    /// True when no registered encoder accepts any of the requested types.
    pub fn is_negotiation_failure(&self) -> bool {
        matches!(self, Self::UnsupportedContentType { .. })
    }
}
