//! Error handling for the brevity CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use brevity_core::{BrevityError, ErrorCategory as CoreCategory};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// No `--lib`, `BREVITY_LIB` or `library.path` was given.
    #[error("no generator library configured")]
    MissingLibrary,

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `brevity-core`.
    #[error(transparent)]
    Core(#[from] BrevityError),

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingLibrary => vec![
                "Pass the library folder with --lib DIR".into(),
                "Or set BREVITY_LIB, or library.path in the config file".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Run 'brevity config path' to locate the config file".into(),
                "Run 'brevity init --force' to recreate a default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingLibrary | Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Specification | CoreCategory::Catalog => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Template | CoreCategory::Action | CoreCategory::Internal => {
                    ErrorCategory::Internal
                }
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Specification or library problem the user can fix.
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal, template or action failure.
    Internal,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use brevity_core::{application::ApplicationError, domain::DomainError};

    use super::*;

    #[test]
    fn specification_errors_exit_two() {
        let err = CliError::from(BrevityError::from(DomainError::UnnamedProject { position: 0 }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn catalog_errors_exit_two() {
        let err = CliError::from(BrevityError::from(DomainError::MissingElements {
            section: "cli".into(),
            elements: vec!["command".into()],
        }));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("command"));
    }

    #[test]
    fn missing_destination_exits_three() {
        let err = CliError::from(BrevityError::from(ApplicationError::DestinationNotFound {
            path: PathBuf::from("/nowhere"),
        }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn action_failure_exits_one_and_keeps_output() {
        let err = CliError::from(BrevityError::from(ApplicationError::ActionFailed {
            action: "init".into(),
            command: "go mod init demo".into(),
            code: Some(1),
            output: "go: command not found".into(),
        }));
        assert_eq!(err.exit_code(), 1);
        assert!(err.format_plain(false).contains("go: command not found"));
    }

    #[test]
    fn missing_library_is_configuration() {
        assert_eq!(CliError::MissingLibrary.exit_code(), 4);
        assert!(CliError::MissingLibrary
            .suggestions()
            .iter()
            .any(|s| s.contains("--lib")));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let s = CliError::MissingLibrary.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "reading spec".into(),
            source: std::io::Error::other("disk gone"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk gone"));
        assert!(!s.contains("--verbose"));
    }
}
