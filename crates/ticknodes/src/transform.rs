use std::collections::VecDeque;

use serde::Deserialize;
use tickcore::{Component, DynNode, Input, Node, NodeError, Poll, Producer};
use tickruntime::{NodeFactory, NodeMetadata};

use crate::parse_config;

/// Applies a function to every value of its single input.
pub struct Map<A, B, F> {
    name: String,
    f: F,
    current: Option<B>,
    _input: std::marker::PhantomData<fn(&A)>,
}

impl<A, B, F> Map<A, B, F>
where
    F: FnMut(&A) -> B,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            current: None,
            _input: std::marker::PhantomData,
        }
    }
}

impl<A: 'static, B: 'static, F: 'static> Node for Map<A, B, F> {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<A: 'static, B: 'static, F: 'static> Producer for Map<A, B, F> {
    type Output = B;

    fn value(&self) -> Option<&B> {
        self.current.as_ref()
    }
}

impl<A, B, F> Component for Map<A, B, F>
where
    A: 'static,
    B: 'static,
    F: FnMut(&A) -> B + 'static,
{
    type Input = (A,);

    fn poll_next(&mut self, (input,): (Input<'_, A>,)) -> Poll {
        match input {
            Input::Ready(value) => {
                self.current = Some((self.f)(value));
                Poll::Ready
            }
            Input::Empty => Poll::Empty,
            Input::Closed => Poll::Closed,
        }
    }
}

/// Like `Map`, but the function may fail. A `None` result closes the node.
pub struct TryMap<A, B, F> {
    name: String,
    f: F,
    current: Option<B>,
    _input: std::marker::PhantomData<fn(&A)>,
}

impl<A, B, F> TryMap<A, B, F>
where
    F: FnMut(&A) -> Option<B>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            current: None,
            _input: std::marker::PhantomData,
        }
    }
}

impl<A: 'static, B: 'static, F: 'static> Node for TryMap<A, B, F> {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<A: 'static, B: 'static, F: 'static> Producer for TryMap<A, B, F> {
    type Output = B;

    fn value(&self) -> Option<&B> {
        self.current.as_ref()
    }
}

impl<A, B, F> Component for TryMap<A, B, F>
where
    A: 'static,
    B: 'static,
    F: FnMut(&A) -> Option<B> + 'static,
{
    type Input = (A,);

    fn poll_next(&mut self, (input,): (Input<'_, A>,)) -> Poll {
        match input {
            Input::Ready(value) => {
                self.current = (self.f)(value);
                if self.current.is_some() {
                    Poll::Ready
                } else {
                    tracing::warn!(node = %self.name, "Transform failed, closing");
                    Poll::Closed
                }
            }
            Input::Empty => Poll::Empty,
            Input::Closed => Poll::Closed,
        }
    }
}

/// Pairs values from two inputs in arrival order.
///
/// Values that arrive on one side wait until the other side produces. The
/// node closes once a closed side has nothing left buffered.
pub struct Zip<A, B> {
    name: String,
    left: VecDeque<A>,
    right: VecDeque<B>,
    current: Option<(A, B)>,
}

impl<A, B> Zip<A, B> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            left: VecDeque::new(),
            right: VecDeque::new(),
            current: None,
        }
    }
}

impl<A: 'static, B: 'static> Node for Zip<A, B> {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<A: 'static, B: 'static> Producer for Zip<A, B> {
    type Output = (A, B);

    fn value(&self) -> Option<&(A, B)> {
        self.current.as_ref()
    }
}

impl<A, B> Component for Zip<A, B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    type Input = (A, B);

    fn poll_next(&mut self, (left, right): (Input<'_, A>, Input<'_, B>)) -> Poll {
        if let Some(value) = left.value() {
            self.left.push_back(value.clone());
        }
        if let Some(value) = right.value() {
            self.right.push_back(value.clone());
        }

        if !self.left.is_empty() && !self.right.is_empty() {
            if let (Some(a), Some(b)) = (self.left.pop_front(), self.right.pop_front()) {
                self.current = Some((a, b));
                return Poll::Ready;
            }
        }

        self.current = None;
        let left_done = left.is_closed() && self.left.is_empty();
        let right_done = right.is_closed() && self.right.is_empty();
        if left_done || right_done {
            Poll::Closed
        } else {
            Poll::Empty
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScaleConfig {
    factor: i64,
}

/// `transform.scale`: multiplies `i64` values by a constant.
///
/// The node closes on the first product that overflows `i64`.
pub struct ScaleNodeFactory;

impl NodeFactory for ScaleNodeFactory {
    fn create(&self, config: &serde_json::Value) -> Result<Box<dyn DynNode>, NodeError> {
        let ScaleConfig { factor } = parse_config(self.node_type(), config)?;
        Ok(Box::new(TryMap::new("scale", move |value: &i64| {
            value.checked_mul(factor)
        })))
    }

    fn node_type(&self) -> &str {
        "transform.scale"
    }

    fn metadata(&self) -> NodeMetadata {
        NodeMetadata {
            description: "Multiply each value by a constant factor".to_string(),
            category: "transform".to_string(),
        }
    }
}
