use thiserror::Error;

/// A schema description that cannot be turned into source.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("key '{key}' is already defined on {dictionary}")]
    DuplicateKey { dictionary: String, key: String },

    #[error("keys '{existing}' and '{key}' on {dictionary} both become field {field}")]
    IdentifierCollision {
        dictionary: String,
        existing: String,
        key: String,
        field: String,
    },

    #[error("'{0}' is reserved in generated source")]
    ReservedName(String),

    #[error("key '{key}' is not defined on {dictionary}")]
    UnknownKey { dictionary: String, key: String },

    #[error("version {version} of {expected} is named {found}")]
    VersionNameMismatch {
        expected: String,
        found: String,
        version: usize,
    },

    #[error("two different definitions are exported as {0}")]
    ConflictingDefinition(String),

    #[error("failed to render source: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
