use std::collections::HashMap;
use std::sync::Arc;

use tickcore::{DynNode, NodeError, NodeId, TickError};

use crate::pipeline::Pipeline;

/// Factory trait for creating node instances from configuration
pub trait NodeFactory: Send + Sync {
    /// Create a new instance of the node with given configuration
    fn create(&self, config: &serde_json::Value) -> Result<Box<dyn DynNode>, NodeError>;

    /// Get node type identifier
    fn node_type(&self) -> &str;

    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::default()
    }
}

/// Metadata about a node type
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub description: String,
    pub category: String,
}

impl Default for NodeMetadata {
    fn default() -> Self {
        Self {
            description: String::new(),
            category: "general".to_string(),
        }
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    factories: HashMap<String, Arc<dyn NodeFactory>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a node factory, replacing any factory with the same type name
    pub fn register(&mut self, factory: Arc<dyn NodeFactory>) {
        let node_type = factory.node_type().to_string();
        tracing::debug!("Registering node type: {}", node_type);
        self.factories.insert(node_type, factory);
    }

    /// Create a node instance from a node type and config
    pub fn create(
        &self,
        node_type: &str,
        config: &serde_json::Value,
    ) -> Result<Box<dyn DynNode>, TickError> {
        let factory = self
            .factories
            .get(node_type)
            .ok_or_else(|| TickError::UnknownNodeType(node_type.to_string()))?;

        Ok(factory.create(config)?)
    }

    /// Create a node and hand it to `pipeline`
    pub fn create_in(
        &self,
        pipeline: &mut Pipeline,
        node_type: &str,
        config: &serde_json::Value,
    ) -> Result<NodeId, TickError> {
        let node = self.create(node_type, config)?;
        Ok(pipeline.create_boxed(node))
    }

    /// Registered node types, sorted by name
    pub fn list_node_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn get_metadata(&self, node_type: &str) -> Option<NodeMetadata> {
        self.factories.get(node_type).map(|f| f.metadata())
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
