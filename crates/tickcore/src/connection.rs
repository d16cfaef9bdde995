use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a node owned by a pipeline.
///
/// Handles are table positions. They are never reused after the node they
/// name has been erased, so a stale handle resolves to "no node" rather than
/// to a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Sentinel that never names a real node.
    pub const INVALID: NodeId = NodeId(usize::MAX);

    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    /// `false` only for the sentinel. Whether the node is still alive is a
    /// question for the pipeline that issued the handle.
    pub const fn is_valid(self) -> bool {
        self.0 != usize::MAX
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("<invalid>")
        }
    }
}

/// Returns the invalid handle.
pub const fn invalid_node_id() -> NodeId {
    NodeId::INVALID
}

/// Checks a handle against the invalid sentinel.
pub const fn is_valid(id: NodeId) -> bool {
    id.is_valid()
}

/// A validated edge: the output of `src` feeds input `slot` of `dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub src: NodeId,
    pub dst: NodeId,
    pub slot: usize,
}
