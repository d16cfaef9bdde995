use crate::{NodeId, PortType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickError {
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The four ways a connection request can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineErrorKind {
    InvalidNodeId,
    NoSuchSlot,
    SlotAlreadyUsed,
    ConnectionTypeMismatch,
}

/// Raised by `Pipeline::connect`. A failed connect leaves the pipeline untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid node id: {0}")]
    InvalidNodeId(NodeId),

    #[error("node {node} has no slot {slot} (arity {arity})")]
    NoSuchSlot {
        node: NodeId,
        slot: usize,
        arity: usize,
    },

    #[error("slot {slot} of node {node} is already used")]
    SlotAlreadyUsed { node: NodeId, slot: usize },

    #[error("connection type mismatch: slot expects {expected}, source produces {}", .found.map_or("nothing", |t| t.name()))]
    ConnectionTypeMismatch {
        expected: PortType,
        found: Option<PortType>,
    },
}

impl PipelineError {
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::InvalidNodeId(_) => PipelineErrorKind::InvalidNodeId,
            PipelineError::NoSuchSlot { .. } => PipelineErrorKind::NoSuchSlot,
            PipelineError::SlotAlreadyUsed { .. } => PipelineErrorKind::SlotAlreadyUsed,
            PipelineError::ConnectionTypeMismatch { .. } => {
                PipelineErrorKind::ConnectionTypeMismatch
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("slot {slot} of node {node} is not connected to a live node")]
    UnfilledSlot { node: NodeId, slot: usize },

    #[error("node {0} produces a value but nothing consumes it")]
    NoConsumer(NodeId),

    #[error("pipeline has no source node")]
    NoSource,

    #[error("pipeline has no sink node")]
    NoSink,

    #[error("pipeline contains disconnected sub-pipelines")]
    Disconnected,

    #[error("pipeline contains a cycle")]
    Cycle,
}

#[derive(Error, Debug, Clone)]
pub enum NodeError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_types() {
        let err = PipelineError::ConnectionTypeMismatch {
            expected: PortType::of::<String>(),
            found: Some(PortType::of::<i32>()),
        };
        assert_eq!(err.kind(), PipelineErrorKind::ConnectionTypeMismatch);
        let message = err.to_string();
        assert!(message.starts_with("connection type mismatch: slot expects "));
        assert!(message.contains("String"));
        assert!(message.ends_with("source produces i32"));
    }

    #[test]
    fn mismatch_from_sink_says_nothing() {
        let err = PipelineError::ConnectionTypeMismatch {
            expected: PortType::of::<i32>(),
            found: None,
        };
        assert!(err.to_string().ends_with("source produces nothing"));
    }

    #[test]
    fn validation_messages_are_lowercase() {
        assert_eq!(ValidationError::Cycle.to_string(), "pipeline contains a cycle");
        assert_eq!(ValidationError::NoSource.to_string(), "pipeline has no source node");
    }

    #[test]
    fn pipeline_errors_convert_into_tick_errors() {
        let err: TickError = PipelineError::InvalidNodeId(NodeId::INVALID).into();
        assert_eq!(err.to_string(), "Pipeline error: invalid node id: <invalid>");
    }
}
