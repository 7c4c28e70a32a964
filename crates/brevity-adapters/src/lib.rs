//! Infrastructure adapters for brevity.
//!
//! This crate implements the ports defined in `brevity-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;
pub mod runner;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::HandlebarsEngine;
pub use runner::ProcessRunner;

use brevity_core::application::{EngineFactory, ports::TemplateEngine};

/// Engine factory producing a fresh [`HandlebarsEngine`] per generator.
pub fn handlebars_engines() -> EngineFactory {
    Box::new(|| Box::new(HandlebarsEngine::new()) as Box<dyn TemplateEngine>)
}
