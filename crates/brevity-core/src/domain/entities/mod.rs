pub mod catalog;
pub mod node;

pub use catalog::{Agenda, Catalog, Dictionary};
pub use node::{Node, NodeId, Tree};
