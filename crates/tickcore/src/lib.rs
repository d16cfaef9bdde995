//! Core abstractions for the tick engine
//!
//! Node capability traits, slot typing, handles, errors, events and
//! configuration. The scheduler lives in `tickruntime`.

mod config;
mod connection;
mod error;
mod events;
mod node;

pub use config::{PipelineConfig, MAX_EVENT_BUFFER_SIZE};
pub use connection::{invalid_node_id, is_valid, Connection, NodeId};
pub use error::{NodeError, PipelineError, PipelineErrorKind, TickError, ValidationError};
pub use events::{EventBus, PipelineEvent};
pub use node::{
    Component, ConcreteNode, DynNode, Input, Inputs, Node, Poll, PortType, Producer, Sink,
    SlotState, Source,
};

/// Result type for tick operations
pub type Result<T> = std::result::Result<T, TickError>;
