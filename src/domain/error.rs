use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Returned when a caller may not view or manage setup keys of an account
    pub fn unauthorized_to_view_setup_keys() -> Self {
        Self::unauthorized("only users with admin power can view setup keys")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Prefix the message with the failing step, keeping the error kind
    pub fn context(self, context: impl AsRef<str>) -> Self {
        let context = context.as_ref();

        match self {
            Self::NotFound { message } => Self::not_found(format!("{context}: {message}")),
            Self::InvalidArgument { message } => {
                Self::invalid_argument(format!("{context}: {message}"))
            }
            Self::Unauthorized { message } => Self::unauthorized(format!("{context}: {message}")),
            Self::Internal { message } => Self::internal(format!("{context}: {message}")),
            Self::Storage { message } => Self::storage(format!("{context}: {message}")),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}
