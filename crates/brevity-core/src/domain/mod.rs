//! Core domain layer for brevity.
//!
//! Pure logic over specification trees: the node arena, the brief document
//! format, the kind-to-agenda catalog, sibling merging and shape validation.
//! No filesystem, templating or process concerns live here; those are
//! reached through the ports of the application layer.

pub mod brief;
pub mod entities;
pub mod error;
pub mod merge;
pub mod validation;
pub mod value_objects;

pub use brief::{Decoder, decode};
pub use entities::{Agenda, Catalog, Dictionary, Node, NodeId, Tree};
pub use error::{DomainError, ErrorCategory};
pub use merge::{merge_node, merge_nodes};
pub use validation::DomainValidator;
pub use value_objects::{ElementKind, MACRO_PREFIX, PROJECT_KIND, ROOT_KIND};
