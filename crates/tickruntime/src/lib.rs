//! Pipeline runtime
//!
//! Owns the node graph, validates connections between typed slots, and
//! drives the graph one tick at a time until every terminal node has closed.

mod executor;
mod export;
mod pipeline;
mod registry;
mod validate;

pub use pipeline::{NodeRef, Pipeline};
pub use registry::{NodeFactory, NodeMetadata, NodeRegistry};
