//! Standard node library
//!
//! Sources, transforms and sinks for common pipelines, plus factories for
//! registry-driven assembly.

mod sink;
mod source;
mod transform;

pub use sink::{Collect, CollectSinkFactory, LogSink, LogSinkFactory};
pub use source::{FnSource, IterSource, RangeSourceFactory};
pub use transform::{Map, ScaleNodeFactory, TryMap, Zip};

use serde::de::DeserializeOwned;
use tickcore::NodeError;
use tickruntime::NodeRegistry;

use std::sync::Arc;

/// Register all standard nodes with a registry
pub fn register_all(registry: &mut NodeRegistry) {
    registry.register(Arc::new(RangeSourceFactory));
    registry.register(Arc::new(ScaleNodeFactory));
    registry.register(Arc::new(LogSinkFactory));
    registry.register(Arc::new(CollectSinkFactory));
}

/// Deserialize factory configuration. `null` reads as an empty object.
pub(crate) fn parse_config<T: DeserializeOwned>(
    node_type: &str,
    config: &serde_json::Value,
) -> Result<T, NodeError> {
    let config = if config.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        config.clone()
    };
    serde_json::from_value(config)
        .map_err(|e| NodeError::Configuration(format!("{}: {}", node_type, e)))
}
