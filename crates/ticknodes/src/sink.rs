use std::fmt::Debug;

use serde::Deserialize;
use tickcore::{Component, DynNode, Input, Node, NodeError, Poll, Producer};
use tickruntime::{NodeFactory, NodeMetadata};

use crate::parse_config;

/// Keeps every value it receives.
pub struct Collect<T> {
    name: String,
    items: Vec<T>,
}

impl<T> Collect<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: 'static> Node for Collect<T> {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<T: 'static> Producer for Collect<T> {
    type Output = ();
}

impl<T: Clone + 'static> Component for Collect<T> {
    type Input = (T,);

    fn poll_next(&mut self, (input,): (Input<'_, T>,)) -> Poll {
        if let Input::Ready(value) = input {
            self.items.push(value.clone());
        }
        input.poll()
    }
}

/// Logs each value it receives
pub struct LogSink<T> {
    label: String,
    received: u64,
    _input: std::marker::PhantomData<fn(&T)>,
}

impl<T> LogSink<T> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            received: 0,
            _input: std::marker::PhantomData,
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

impl<T: 'static> Node for LogSink<T> {
    fn name(&self) -> String {
        self.label.clone()
    }
}

impl<T: 'static> Producer for LogSink<T> {
    type Output = ();
}

impl<T: Debug + 'static> Component for LogSink<T> {
    type Input = (T,);

    fn poll_next(&mut self, (input,): (Input<'_, T>,)) -> Poll {
        match input {
            Input::Ready(value) => {
                self.received += 1;
                tracing::info!(label = %self.label, ?value, "Received value");
            }
            Input::Closed => {
                tracing::debug!(label = %self.label, received = self.received, "Input closed");
            }
            Input::Empty => {}
        }
        input.poll()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogConfig {
    label: Option<String>,
}

/// `sink.log`: logs `i64` values
pub struct LogSinkFactory;

impl NodeFactory for LogSinkFactory {
    fn create(&self, config: &serde_json::Value) -> Result<Box<dyn DynNode>, NodeError> {
        let LogConfig { label } = parse_config(self.node_type(), config)?;
        let label = label.unwrap_or_else(|| "log".to_string());
        Ok(Box::new(LogSink::<i64>::new(label)))
    }

    fn node_type(&self) -> &str {
        "sink.log"
    }

    fn metadata(&self) -> NodeMetadata {
        NodeMetadata {
            description: "Log every received value".to_string(),
            category: "sink".to_string(),
        }
    }
}

/// `sink.collect`: keeps every `i64` value it receives
pub struct CollectSinkFactory;

impl NodeFactory for CollectSinkFactory {
    fn create(&self, _config: &serde_json::Value) -> Result<Box<dyn DynNode>, NodeError> {
        Ok(Box::new(Collect::<i64>::new("collect")))
    }

    fn node_type(&self) -> &str {
        "sink.collect"
    }

    fn metadata(&self) -> NodeMetadata {
        NodeMetadata {
            description: "Collect received values in memory".to_string(),
            category: "sink".to_string(),
        }
    }
}
