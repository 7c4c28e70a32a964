//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `brevity-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: inspection, directory listing, globbing, file writes
//!   - `TemplateEngine`: named template registration and rendering
//!   - `ActionRunner`: direct execution of external programs

pub mod output;

pub use output::{ActionOutput, ActionRunner, Filesystem, PathInfo, TemplateEngine};
