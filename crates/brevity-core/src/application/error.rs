//! Application layer errors.
//!
//! These errors represent failures while talking to the outside world:
//! templates, files and external processes. Specification and catalog
//! errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A template node names a template the engine never registered.
    #[error("no template found for {name}")]
    TemplateNotFound { name: String },

    /// Template parsing or execution failed.
    #[error("template {template} failed: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// A template's `file` value does not name a file inside the project.
    #[error("template {template}: invalid file path '{path}': {reason}")]
    InvalidFilePath {
        template: String,
        path: String,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    #[error("library folder not found: {path}")]
    LibraryNotFound { path: PathBuf },

    #[error("destination not found: {path}")]
    DestinationNotFound { path: PathBuf },

    #[error("destination is not a folder: {path}")]
    DestinationNotFolder { path: PathBuf },

    #[error("destination is not writable: {path}")]
    DestinationNotWritable { path: PathBuf },

    /// The resolved `exec` value could not be split into words.
    #[error("action {action}: cannot parse command '{command}'")]
    ActionParse { action: String, command: String },

    /// The program could not be started.
    #[error("action {action}: failed to start '{program}': {reason}")]
    ActionSpawn {
        action: String,
        program: String,
        reason: String,
    },

    /// The program ran and exited unsuccessfully.
    #[error("action {action} failed ({}): {command}\n{output}", exit_label(.code))]
    ActionFailed {
        action: String,
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { name } => vec![
                format!("Add {name}.tmpl to the section's templates folder"),
                format!("Or declare it inline with define:{name} in the generator definitions"),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Check the syntax of template {template}"),
                "Template data exposes type, name, content, keys, body and parent".into(),
            ],
            Self::InvalidFilePath { template, .. } => vec![
                format!("Check the file value of template {template}"),
                "File paths are relative to the project folder and may not use '..'".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have the required permissions".into(),
            ],
            Self::LibraryNotFound { .. } => vec![
                "Pass the library folder with --lib".into(),
                "Or set BREVITY_LIB / library.path in the config file".into(),
            ],
            Self::DestinationNotFound { path } => vec![
                format!("Create the folder first: mkdir -p {}", path.display()),
            ],
            Self::DestinationNotFolder { .. } => vec![
                "The destination must be an existing folder, not a file".into(),
            ],
            Self::DestinationNotWritable { path } => vec![
                format!("Grant write permission: chmod u+w {}", path.display()),
            ],
            Self::ActionParse { .. } => vec![
                "Check quoting in the action's exec value".into(),
            ],
            Self::ActionSpawn { program, .. } => vec![
                format!("Make sure '{program}' is installed and on PATH"),
                "Use --render to generate files without running actions".into(),
            ],
            Self::ActionFailed { .. } => vec![
                "The command output is shown above".into(),
                "Use --render to generate files without running actions".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. }
            | Self::RenderingFailed { .. }
            | Self::InvalidFilePath { .. } => ErrorCategory::Template,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::LibraryNotFound { .. } | Self::DestinationNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::DestinationNotFolder { .. } | Self::DestinationNotWritable { .. } => {
                ErrorCategory::Specification
            }
            Self::ActionParse { .. } | Self::ActionSpawn { .. } | Self::ActionFailed { .. } => {
                ErrorCategory::Action
            }
        }
    }
}
