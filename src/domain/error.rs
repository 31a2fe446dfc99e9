use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is the not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Prepend operation context to the message, preserving the error kind
    pub fn context(self, context: impl Into<String>) -> Self {
        let context = context.into();

        match self {
            Self::NotFound { message } => Self::NotFound {
                message: format!("{}: {}", context, message),
            },
            Self::Validation { message } => Self::Validation {
                message: format!("{}: {}", context, message),
            },
            Self::Conflict { message } => Self::Conflict {
                message: format!("{}: {}", context, message),
            },
            Self::Storage { message } => Self::Storage {
                message: format!("{}: {}", context, message),
            },
            Self::Configuration { message } => Self::Configuration {
                message: format!("{}: {}", context, message),
            },
            Self::Internal { message } => Self::Internal {
                message: format!("{}: {}", context, message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Task with ID 42 not found");
        assert_eq!(error.to_string(), "Not found: Task with ID 42 not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("title is required");
        assert_eq!(error.to_string(), "Validation error: title is required");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Username 'alice' is already in use");
        assert_eq!(
            error.to_string(),
            "Conflict: Username 'alice' is already in use"
        );
    }

    #[test]
    fn test_storage_error() {
        let error = DomainError::storage("connection reset");
        assert_eq!(error.to_string(), "Storage error: connection reset");
    }

    #[test]
    fn test_context_preserves_kind() {
        let error = DomainError::not_found("Task with ID 3 not found")
            .context("could not delete task with ID 3");

        assert!(error.is_not_found());
        assert_eq!(
            error.to_string(),
            "Not found: could not delete task with ID 3: Task with ID 3 not found"
        );
    }
}
