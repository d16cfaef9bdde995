#![allow(dead_code)]

use std::collections::VecDeque;

use tickcore::{Component, Input, Node, Poll, Producer};

/// Plays back a script: `Some(v)` is a ready tick, `None` an empty one.
/// Closes once the script runs out.
pub struct Script<T> {
    name: String,
    script: VecDeque<Option<T>>,
    current: Option<T>,
    pub polls: usize,
}

impl<T> Script<T> {
    pub fn new(name: &str, script: Vec<Option<T>>) -> Self {
        Self {
            name: name.to_string(),
            script: script.into(),
            current: None,
            polls: 0,
        }
    }

    pub fn values(name: &str, values: Vec<T>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }
}

impl<T: 'static> Node for Script<T> {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<T: 'static> Producer for Script<T> {
    type Output = T;

    fn value(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

impl<T: 'static> Component for Script<T> {
    type Input = ();

    fn poll_next(&mut self, _input: ()) -> Poll {
        self.polls += 1;
        match self.script.pop_front() {
            Some(Some(value)) => {
                self.current = Some(value);
                Poll::Ready
            }
            Some(None) => Poll::Empty,
            None => Poll::Closed,
        }
    }
}

/// Sink remembering every value and every poll result it returned.
pub struct Recorder<T> {
    name: String,
    pub values: Vec<T>,
    pub polls: Vec<Poll>,
}

impl<T> Recorder<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
            polls: Vec::new(),
        }
    }
}

impl<T: 'static> Node for Recorder<T> {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<T: 'static> Producer for Recorder<T> {
    type Output = ();
}

impl<T: Clone + 'static> Component for Recorder<T> {
    type Input = (T,);

    fn poll_next(&mut self, (input,): (Input<'_, T>,)) -> Poll {
        if let Some(value) = input.value() {
            self.values.push(value.clone());
        }
        let poll = input.poll();
        self.polls.push(poll);
        poll
    }
}

/// Adds two integers once both are available in the same tick.
pub struct Add {
    current: Option<i32>,
}

impl Add {
    pub fn new() -> Self {
        Self { current: None }
    }
}

impl Node for Add {
    fn name(&self) -> String {
        "add".to_string()
    }
}

impl Producer for Add {
    type Output = i32;

    fn value(&self) -> Option<&i32> {
        self.current.as_ref()
    }
}

impl Component for Add {
    type Input = (i32, i32);

    fn poll_next(&mut self, (a, b): (Input<'_, i32>, Input<'_, i32>)) -> Poll {
        match (a, b) {
            (Input::Ready(a), Input::Ready(b)) => {
                self.current = Some(a + b);
                Poll::Ready
            }
            (Input::Closed, _) | (_, Input::Closed) => Poll::Closed,
            _ => Poll::Empty,
        }
    }
}

/// Misbehaves by becoming ready again after closing.
pub struct Relapse {
    pub polls: usize,
    value: u8,
}

impl Relapse {
    pub fn new() -> Self {
        Self { polls: 0, value: 7 }
    }
}

impl Node for Relapse {
    fn name(&self) -> String {
        "relapse".to_string()
    }
}

impl Producer for Relapse {
    type Output = u8;

    fn value(&self) -> Option<&u8> {
        Some(&self.value)
    }
}

impl Component for Relapse {
    type Input = ();

    fn poll_next(&mut self, _input: ()) -> Poll {
        self.polls += 1;
        if self.polls == 1 {
            Poll::Closed
        } else {
            Poll::Ready
        }
    }
}
