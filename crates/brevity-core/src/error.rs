//! Unified error handling for brevity core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for brevity core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BrevityError {
    /// Malformed specification or generator library.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Template, filesystem or action failures.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl BrevityError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run `brevity config path` to locate the config file".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in brevity".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Specification => ErrorCategory::Specification,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Catalog => ErrorCategory::Catalog,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The specification or destination is unusable.
    Specification,
    /// Specification and library disagree.
    Catalog,
    /// A template could not be found or rendered.
    Template,
    /// An external action failed.
    Action,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type BrevityResult<T> = Result<T, BrevityError>;

/// Extension trait for turning I/O failures into filesystem errors.
pub trait PathContext<T> {
    fn at_path(self, path: impl AsRef<std::path::Path>) -> BrevityResult<T>;
}

impl<T, E> PathContext<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn at_path(self, path: impl AsRef<std::path::Path>) -> BrevityResult<T> {
        self.map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.as_ref().to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
