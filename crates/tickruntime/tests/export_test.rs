mod common;

use common::{Add, Recorder, Script};
use tickcore::ValidationError;
use tickruntime::Pipeline;

fn linear() -> Pipeline {
    let mut pipeline = Pipeline::new();
    let a = pipeline.create_node(Script::values("a", vec![1]));
    let b = pipeline.create_node(Recorder::<i32>::new("b"));
    pipeline.connect(a, b, 0).unwrap();
    pipeline
}

#[test]
fn test_dot_lists_nodes_then_edges() {
    let pipeline = linear();

    assert_eq!(
        pipeline.to_dot(),
        "digraph G {\n  \"0 a\"\n  \"1 b\"\n\n  \"0 a\" -> \"1 b\"\n}\n"
    );
    assert_eq!(pipeline.to_string(), pipeline.to_dot());
}

#[test]
fn test_dot_skips_erased_nodes_and_their_edges() {
    let mut pipeline = linear();
    pipeline.erase_node(tickcore::NodeId::from_index(0));

    assert_eq!(pipeline.to_dot(), "digraph G {\n  \"1 b\"\n\n}\n");
}

#[test]
fn test_dot_escapes_quotes_and_backslashes() {
    let mut pipeline = Pipeline::new();
    let a = pipeline.create_node(Script::values("say \"hi\"", vec![1]));
    let b = pipeline.create_node(Recorder::<i32>::new("C:\\out"));
    pipeline.connect(a, b, 0).unwrap();

    assert_eq!(
        pipeline.to_dot(),
        "digraph G {\n  \"0 say \\\"hi\\\"\"\n  \"1 C:\\\\out\"\n\n  \"0 say \\\"hi\\\"\" -> \"1 C:\\\\out\"\n}\n"
    );
}

#[test]
fn test_empty_pipeline_dot() {
    assert_eq!(Pipeline::new().to_dot(), "digraph G {\n\n}\n");
}

#[test]
fn test_graph_view_carries_slots() {
    let mut pipeline = Pipeline::new();
    let left = pipeline.create_node(Script::values("left", vec![1]));
    let right = pipeline.create_node(Script::values("right", vec![2]));
    let add = pipeline.create_node(Add::new());
    pipeline.connect(left, add, 0).unwrap();
    pipeline.connect(right, add, 1).unwrap();

    let graph = pipeline.graph();

    assert_eq!(graph.node_count(), 3);
    let slots: Vec<usize> = graph.raw_edges().iter().map(|e| e.weight).collect();
    assert_eq!(slots, vec![0, 1]);
}

#[test]
fn test_linear_pipeline_is_valid() {
    let pipeline = linear();

    assert_eq!(pipeline.validate(), Ok(()));
    assert!(pipeline.is_valid());
}

#[test]
fn test_empty_pipeline_has_no_source() {
    assert_eq!(Pipeline::new().validate(), Err(ValidationError::NoSource));
}

#[test]
fn test_unfilled_slot_is_invalid() {
    let mut pipeline = Pipeline::new();
    let b = pipeline.create_node(Recorder::<i32>::new("b"));

    assert_eq!(
        pipeline.validate(),
        Err(ValidationError::UnfilledSlot { node: b, slot: 0 })
    );
}

#[test]
fn test_slot_bound_to_erased_node_is_unfilled() {
    let mut pipeline = linear();
    pipeline.erase_node(tickcore::NodeId::from_index(0));

    assert!(matches!(
        pipeline.validate(),
        Err(ValidationError::UnfilledSlot { slot: 0, .. })
    ));
}

#[test]
fn test_producer_without_consumer_is_invalid() {
    let mut pipeline = linear();
    let extra = pipeline.create_node(Script::values("extra", vec![1]));

    assert_eq!(pipeline.validate(), Err(ValidationError::NoConsumer(extra)));
}

#[test]
fn test_disconnected_pipelines_are_invalid() {
    let mut pipeline = linear();
    let c = pipeline.create_node(Script::values("c", vec![1]));
    let d = pipeline.create_node(Recorder::<i32>::new("d"));
    pipeline.connect(c, d, 0).unwrap();

    assert_eq!(pipeline.validate(), Err(ValidationError::Disconnected));
}

#[test]
fn test_cycles_are_invalid() {
    let mut pipeline = Pipeline::new();
    let left = pipeline.create_node(Script::values("left", vec![1]));
    let add = pipeline.create_node(Add::new());
    let sink = pipeline.create_node(Recorder::<i32>::new("sink"));
    pipeline.connect(left, add, 0).unwrap();
    pipeline.connect(add, add, 1).unwrap();
    pipeline.connect(add, sink, 0).unwrap();

    assert_eq!(pipeline.validate(), Err(ValidationError::Cycle));
}
