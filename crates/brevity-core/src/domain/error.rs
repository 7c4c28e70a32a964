// ============================================================================
// domain/error.rs - SPECIFICATION AND CATALOG ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they are attached to reports and re-raised)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Document errors
    // ========================================================================
    #[error("line {line}: {reason}")]
    Decode { line: usize, reason: String },

    // ========================================================================
    // Specification shape errors
    // ========================================================================
    #[error("invalid brevity spec: {0}")]
    InvalidSpec(String),

    #[error("invalid brevity spec: project {position} must be named")]
    UnnamedProject { position: usize },

    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    // ========================================================================
    // Generator definition errors
    // ========================================================================
    #[error("generator {source_name} missing {section} node")]
    InvalidGenerator {
        source_name: String,
        section: &'static str,
    },

    #[error("generator {source_name} has {count} top-level forms, expected one")]
    GeneratorForms { source_name: String, count: usize },

    #[error("template {position} (line {line}): {reason}")]
    InvalidTemplateNode {
        position: usize,
        line: usize,
        reason: String,
    },

    #[error("action {position} (line {line}): {reason}")]
    InvalidActionNode {
        position: usize,
        line: usize,
        reason: String,
    },

    #[error("sub definitions must have names: see generator for section {section}")]
    UnnamedDefinitions { section: String },

    // ========================================================================
    // Catalog errors
    // ========================================================================
    #[error("section {section} must name a variation: {}", .available.join(", "))]
    UndeclaredVariation {
        section: String,
        name: String,
        available: Vec<String>,
    },

    #[error("empty generator catalog for section {section}")]
    EmptyCatalog { section: String },

    #[error("no templates found: section {section}")]
    NoTemplates { section: String },

    #[error("invalid {section} spec: missing elements [{}]", .elements.join(", "))]
    MissingElements {
        section: String,
        elements: Vec<String>,
    },

    #[error("macro expansion did not settle after {limit} rounds: still expanding [{}]", .pending.join(", "))]
    MacroExpansionLimit { limit: usize, pending: Vec<String> },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Decode { line, .. } => vec![
                format!("Check the brief syntax near line {line}"),
                "Elements are written as kind:name key:value `content`".into(),
            ],
            Self::InvalidSpec(_) => vec![
                "The top-level element must be 'brevity'".into(),
                "Every direct child must be a 'project' element".into(),
            ],
            Self::UnnamedProject { .. } => vec![
                "Name every project, e.g. project:demo".into(),
                "The name becomes the destination subfolder".into(),
            ],
            Self::InvalidGenerator { section, .. } => vec![
                format!("Add a '{section}' node to the generator definition"),
                "A generator needs both 'templates' and 'actions' sections, even if empty".into(),
            ],
            Self::GeneratorForms { .. } => vec![
                "A generator definition has a single top-level element".into(),
                "Indent templates, actions and definitions under it".into(),
            ],
            Self::InvalidTemplateNode { .. } => vec![
                "Templates are declared as name element:<kind> file:<path>".into(),
            ],
            Self::InvalidActionNode { .. } => vec![
                "Actions are declared as name element:<kind> exec:<command>".into(),
            ],
            Self::UndeclaredVariation { section, available, .. } => {
                let mut out = vec![format!("Choose a variation for {section}:")];
                out.extend(available.iter().map(|v| format!("  • {section}:{v}")));
                out
            }
            Self::EmptyCatalog { section } => vec![
                format!("No generator.brief was found for section '{section}'"),
                "Check the library path (--lib or BREVITY_LIB)".into(),
            ],
            Self::MissingElements { elements, .. } => vec![
                format!("The generator expects these elements: {}", elements.join(", ")),
                "Check the specification for misspelled element kinds".into(),
            ],
            Self::MacroExpansionLimit { pending, .. } => vec![
                format!("Macros for [{}] keep producing macro elements", pending.join(", ")),
                "Make sure no macro expands (directly or indirectly) into its own kind".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode { .. }
            | Self::InvalidSpec(_)
            | Self::UnnamedProject { .. }
            | Self::InvalidProjectName { .. } => ErrorCategory::Specification,
            Self::InvalidGenerator { .. }
            | Self::GeneratorForms { .. }
            | Self::InvalidTemplateNode { .. }
            | Self::InvalidActionNode { .. }
            | Self::UnnamedDefinitions { .. }
            | Self::MacroExpansionLimit { .. } => ErrorCategory::Configuration,
            Self::UndeclaredVariation { .. }
            | Self::EmptyCatalog { .. }
            | Self::NoTemplates { .. }
            | Self::MissingElements { .. } => ErrorCategory::Catalog,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The specification document is malformed.
    Specification,
    /// The generator library is malformed.
    Configuration,
    /// The specification and the library disagree.
    Catalog,
}
