//! brevity core - hexagonal architecture implementation.
//!
//! This crate provides the domain and application layers of the brevity
//! code generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           brevity-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerateService, Generator, Walker)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateEngine, Runner)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     brevity-adapters (Infrastructure)   │
//! │ (Handlebars, LocalFilesystem, Process)  │
//! └─────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Tree, brief, Catalog, merge)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brevity_core::prelude::*;
//!
//! let service = GenerateService::new(filesystem, runner, engines, options);
//! let mut spec = service.read_spec("app.brief".as_ref())?;
//! let report = service.generate(&mut spec, "./out".as_ref())?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub use error::{BrevityError, BrevityResult, ErrorCategory};

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateService, GenerationReport, GeneratorOptions, Specification, Step,
        ports::{ActionOutput, ActionRunner, Filesystem, PathInfo, TemplateEngine},
    };
    pub use crate::domain::{ElementKind, Node, NodeId, Tree};
    pub use crate::error::{BrevityError, BrevityResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
