use std::ops::Range;

use serde::Deserialize;
use tickcore::{Component, DynNode, Node, NodeError, Poll, Producer};
use tickruntime::{NodeFactory, NodeMetadata};

use crate::parse_config;

/// Emits every item of an iterator, one per tick, then closes.
pub struct IterSource<I: Iterator> {
    name: String,
    iter: I,
    current: Option<I::Item>,
}

impl<I: Iterator> IterSource<I> {
    pub fn new(name: impl Into<String>, items: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            name: name.into(),
            iter: items.into_iter(),
            current: None,
        }
    }
}

impl<I> Node for IterSource<I>
where
    I: Iterator + 'static,
    I::Item: 'static,
{
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<I> Producer for IterSource<I>
where
    I: Iterator + 'static,
    I::Item: 'static,
{
    type Output = I::Item;

    fn value(&self) -> Option<&I::Item> {
        self.current.as_ref()
    }
}

impl<I> Component for IterSource<I>
where
    I: Iterator + 'static,
    I::Item: 'static,
{
    type Input = ();

    fn poll_next(&mut self, _input: ()) -> Poll {
        self.current = self.iter.next();
        match self.current {
            Some(_) => Poll::Ready,
            None => Poll::Closed,
        }
    }
}

/// Source driven by a closure.
///
/// `Some(Some(v))` emits `v`, `Some(None)` skips the tick and `None` closes.
pub struct FnSource<T, F> {
    name: String,
    next: F,
    current: Option<T>,
}

impl<T, F> FnSource<T, F>
where
    F: FnMut() -> Option<Option<T>>,
{
    pub fn new(name: impl Into<String>, next: F) -> Self {
        Self {
            name: name.into(),
            next,
            current: None,
        }
    }
}

impl<T: 'static, F: 'static> Node for FnSource<T, F> {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<T: 'static, F: 'static> Producer for FnSource<T, F> {
    type Output = T;

    fn value(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

impl<T, F> Component for FnSource<T, F>
where
    T: 'static,
    F: FnMut() -> Option<Option<T>> + 'static,
{
    type Input = ();

    fn poll_next(&mut self, _input: ()) -> Poll {
        match (self.next)() {
            Some(Some(value)) => {
                self.current = Some(value);
                Poll::Ready
            }
            Some(None) => {
                self.current = None;
                Poll::Empty
            }
            None => {
                self.current = None;
                Poll::Closed
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RangeConfig {
    start: i64,
    end: i64,
}

/// `source.range`: emits `start..end` as `i64`
pub struct RangeSourceFactory;

impl NodeFactory for RangeSourceFactory {
    fn create(&self, config: &serde_json::Value) -> Result<Box<dyn DynNode>, NodeError> {
        let RangeConfig { start, end } = parse_config(self.node_type(), config)?;
        let range: Range<i64> = start..end;
        Ok(Box::new(IterSource::new("range", range)))
    }

    fn node_type(&self) -> &str {
        "source.range"
    }

    fn metadata(&self) -> NodeMetadata {
        NodeMetadata {
            description: "Emit the integers start..end, one per tick".to_string(),
            category: "source".to_string(),
        }
    }
}
