use thiserror::Error;

/// Canonical error type for engine operations.
///
/// Data-shape problems in records never surface here; they degrade to safe
/// defaults at the accessor level. Errors exist only at real boundaries:
/// validation of caller input, persistence, and (de)serialization.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity was not found in the engine state.
    #[error("{entity} `{id}` was not found")]
    NotFound {
        /// Entity type name (e.g. `"segment"`).
        entity: &'static str,
        /// Identifier of the missing entity.
        id: String,
    },

    /// Validation error for caller-supplied input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Durable storage slot could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error occurred.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Creates a `NotFound` variant.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a `Validation` variant.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a `Storage` variant.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_eof() || err.is_syntax() || err.is_data() {
            Self::Deserialization(err.to_string())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

/// Convenient result alias for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;
