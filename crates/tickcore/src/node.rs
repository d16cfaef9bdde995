use serde::{Deserialize, Serialize};
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// Result of polling a node for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Poll {
    /// A value is available.
    Ready,
    /// No value this tick, but there might be one later.
    Empty,
    /// No value, and there never will be again.
    Closed,
}

/// Runtime tag for the type carried by a slot or produced by a node.
#[derive(Clone, Copy)]
pub struct PortType {
    id: TypeId,
    name: &'static str,
}

impl PortType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for PortType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PortType {}

impl std::hash::Hash for PortType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PortType({})", self.name)
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Typed view of one input slot for the current tick.
pub enum Input<'a, T> {
    Ready(&'a T),
    Empty,
    Closed,
}

impl<'a, T> Input<'a, T> {
    pub fn value(&self) -> Option<&'a T> {
        match *self {
            Input::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Input::Ready(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Input::Closed)
    }

    pub fn poll(&self) -> Poll {
        match self {
            Input::Ready(_) => Poll::Ready,
            Input::Empty => Poll::Empty,
            Input::Closed => Poll::Closed,
        }
    }

    fn from_slot(slot: Option<SlotState<'a>>) -> Self
    where
        T: 'static,
    {
        match slot {
            Some(SlotState::Ready(value)) => {
                value.downcast_ref::<T>().map_or(Input::Closed, Input::Ready)
            }
            Some(SlotState::Empty) => Input::Empty,
            Some(SlotState::Closed) | None => Input::Closed,
        }
    }
}

impl<T> Clone for Input<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Input<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Input<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Input::Empty => f.write_str("Empty"),
            Input::Closed => f.write_str("Closed"),
        }
    }
}

/// Type-erased slot state handed across the `DynNode` boundary.
#[derive(Clone, Copy)]
pub enum SlotState<'a> {
    Ready(&'a dyn Any),
    Empty,
    Closed,
}

impl fmt::Debug for SlotState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Ready(_) => f.write_str("Ready(..)"),
            SlotState::Empty => f.write_str("Empty"),
            SlotState::Closed => f.write_str("Closed"),
        }
    }
}

/// Fixed-size tuple of input types, `()` through six slots.
pub trait Inputs: 'static {
    const ARITY: usize;

    /// One `Input` per slot, in slot order.
    type View<'a>;

    fn port_types() -> Vec<PortType>;

    fn view<'a>(slots: &[SlotState<'a>]) -> Self::View<'a>;
}

macro_rules! impl_inputs {
    ($arity:expr; $($name:ident : $idx:tt),*) => {
        impl<$($name: 'static),*> Inputs for ($($name,)*) {
            const ARITY: usize = $arity;

            type View<'a> = ($(Input<'a, $name>,)*);

            fn port_types() -> Vec<PortType> {
                vec![$(PortType::of::<$name>()),*]
            }

            #[allow(unused_variables, clippy::unused_unit)]
            fn view<'a>(slots: &[SlotState<'a>]) -> Self::View<'a> {
                ($(Input::<$name>::from_slot(slots.get($idx).copied()),)*)
            }
        }
    };
}

impl_inputs!(0;);
impl_inputs!(1; A: 0);
impl_inputs!(2; A: 0, B: 1);
impl_inputs!(3; A: 0, B: 1, C: 2);
impl_inputs!(4; A: 0, B: 1, C: 2, D: 3);
impl_inputs!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_inputs!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// Every graph participant has a display name.
pub trait Node: 'static {
    /// Human-readable label. Must not change over the node's lifetime.
    fn name(&self) -> String;
}

/// A node that may expose a typed value. Sinks use `Output = ()`.
pub trait Producer: Node {
    type Output: 'static;

    /// The value prepared by the last `Poll::Ready`. The pipeline reads it
    /// only after a ready poll.
    fn value(&self) -> Option<&Self::Output> {
        None
    }
}

/// A node with a declared input tuple and output type.
pub trait Component: Producer {
    type Input: Inputs;

    /// Process a single tick, preparing the next value.
    ///
    /// Called only by the pipeline. Once this returns `Poll::Closed` the
    /// pipeline never calls it again.
    fn poll_next(&mut self, input: <Self::Input as Inputs>::View<'_>) -> Poll;
}

/// A component without inputs producing `T`.
pub trait Source<T: 'static>: Component<Input = (), Output = T> {}

impl<T: 'static, C> Source<T> for C where C: Component<Input = (), Output = T> {}

/// A component consuming a single `T` and producing nothing.
pub trait Sink<T: 'static>: Component<Input = (T,), Output = ()> {}

impl<T: 'static, C> Sink<T> for C where C: Component<Input = (T,), Output = ()> {}

/// Types that can be registered with a pipeline: sized, owned components.
pub trait ConcreteNode: Component + Sized {}

impl<C: Component + Sized> ConcreteNode for C {}

mod sealed {
    pub trait Sealed {}

    impl<C: super::Component> Sealed for C {}
}

/// Object-safe form of a `Component`, stored by the pipeline.
///
/// Sealed and blanket-implemented for every component.
pub trait DynNode: Node + sealed::Sealed {
    fn input_types(&self) -> Vec<PortType>;

    /// `None` for nodes whose output is `()`.
    fn output_type(&self) -> Option<PortType>;

    fn poll_dyn(&mut self, slots: &[SlotState<'_>]) -> Poll;

    fn value_dyn(&self) -> Option<&dyn Any>;

    fn as_any(&self) -> &dyn Any;
}

impl<C: Component> DynNode for C {
    fn input_types(&self) -> Vec<PortType> {
        C::Input::port_types()
    }

    fn output_type(&self) -> Option<PortType> {
        let output = PortType::of::<C::Output>();
        if output == PortType::of::<()>() {
            None
        } else {
            Some(output)
        }
    }

    fn poll_dyn(&mut self, slots: &[SlotState<'_>]) -> Poll {
        self.poll_next(C::Input::view(slots))
    }

    fn value_dyn(&self) -> Option<&dyn Any> {
        self.value().map(|value| value as &dyn Any)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
