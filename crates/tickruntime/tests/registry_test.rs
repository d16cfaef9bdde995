mod common;

use std::sync::Arc;

use common::{Recorder, Script};
use tickcore::{DynNode, NodeError, TickError};
use tickruntime::{NodeFactory, NodeMetadata, NodeRegistry, Pipeline};

struct ScriptFactory;

impl NodeFactory for ScriptFactory {
    fn create(&self, config: &serde_json::Value) -> Result<Box<dyn DynNode>, NodeError> {
        let count = config
            .get("count")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| NodeError::Configuration("missing count".to_string()))?;
        Ok(Box::new(Script::values("script", (0..count as i32).collect())))
    }

    fn node_type(&self) -> &str {
        "test.script"
    }

    fn metadata(&self) -> NodeMetadata {
        NodeMetadata {
            description: "Scripted source".to_string(),
            category: "test".to_string(),
        }
    }
}

struct RecorderFactory;

impl NodeFactory for RecorderFactory {
    fn create(&self, _config: &serde_json::Value) -> Result<Box<dyn DynNode>, NodeError> {
        Ok(Box::new(Recorder::<i32>::new("recorder")))
    }

    fn node_type(&self) -> &str {
        "test.recorder"
    }
}

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry.register(Arc::new(RecorderFactory));
    registry.register(Arc::new(ScriptFactory));
    registry
}

#[test]
fn test_list_node_types_is_sorted() {
    assert_eq!(
        registry().list_node_types(),
        vec!["test.recorder".to_string(), "test.script".to_string()]
    );
}

#[test]
fn test_metadata_defaults() {
    let registry = registry();

    assert_eq!(registry.get_metadata("test.recorder").unwrap().category, "general");
    assert_eq!(registry.get_metadata("test.script").unwrap().category, "test");
    assert!(registry.get_metadata("missing").is_none());
}

#[test]
fn test_registry_built_nodes_run_like_typed_ones() {
    let registry = registry();
    let mut pipeline = Pipeline::new();

    let src = registry
        .create_in(&mut pipeline, "test.script", &serde_json::json!({ "count": 3 }))
        .unwrap();
    let dst = registry
        .create_in(&mut pipeline, "test.recorder", &serde_json::Value::Null)
        .unwrap();
    pipeline.connect(src, dst, 0).unwrap();
    pipeline.run();

    let recorder = pipeline
        .get_node(dst)
        .and_then(|n| n.downcast_ref::<Recorder<i32>>())
        .unwrap();
    assert_eq!(recorder.values, vec![0, 1, 2]);
}

#[test]
fn test_unknown_node_type() {
    let mut pipeline = Pipeline::new();

    let err = registry()
        .create_in(&mut pipeline, "nope", &serde_json::Value::Null)
        .unwrap_err();

    assert!(matches!(err, TickError::UnknownNodeType(ref t) if t == "nope"));
    assert!(pipeline.is_empty());
}

#[test]
fn test_factory_configuration_errors_propagate() {
    let err = registry()
        .create("test.script", &serde_json::json!({}))
        .err()
        .unwrap();

    assert!(matches!(err, TickError::Node(NodeError::Configuration(_))));
}
