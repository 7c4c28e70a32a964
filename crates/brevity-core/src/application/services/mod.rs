//! Application services - orchestrate use cases.
//!
//! Generator compilation, macro expansion and the tree walk are composed
//! by [`GenerateService`] into the "generate projects from a spec" use case.

pub mod generate_service;
pub mod generator;
pub mod macros;
pub mod walker;

pub use generate_service::{
    EngineFactory, GenerateService, GeneratorOptions, SectionInfo, Specification,
};
pub use generator::{Generator, GeneratorCompiler};
pub use macros::{MAX_EXPANSION_ROUNDS, MacroExpander};
pub use walker::{GenerationReport, Step, Walker, output_path, resolve_value};
