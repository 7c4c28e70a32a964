//! Application layer for brevity.
//!
//! This layer contains:
//! - **Services**: generator compilation, macro expansion, the tree walk,
//!   and the `GenerateService` use case that composes them
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Specification and catalog rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    EngineFactory, GenerateService, GenerationReport, Generator, GeneratorOptions, SectionInfo,
    Specification, Step,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ActionOutput, ActionRunner, Filesystem, PathInfo, TemplateEngine};

pub use error::ApplicationError;
