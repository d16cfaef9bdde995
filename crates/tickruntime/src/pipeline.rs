use std::fmt;

use tickcore::{
    ConcreteNode, Connection, DynNode, EventBus, Node, NodeId, PipelineConfig, PipelineError,
    PipelineEvent, Poll, PortType,
};
use tokio::sync::broadcast::Receiver;

/// A node owned by the pipeline plus the bookkeeping the scheduler needs.
pub(crate) struct NodeEntry {
    pub(crate) node: Box<dyn DynNode>,
    /// Upstream binding per input slot.
    pub(crate) inputs: Vec<Option<NodeId>>,
    pub(crate) input_types: Vec<PortType>,
    pub(crate) output_type: Option<PortType>,
    /// Result of the most recent poll, `None` before the first tick.
    pub(crate) last_poll: Option<Poll>,
}

impl NodeEntry {
    fn new(node: Box<dyn DynNode>) -> Self {
        let input_types = node.input_types();
        let output_type = node.output_type();
        Self {
            inputs: vec![None; input_types.len()],
            input_types,
            output_type,
            last_poll: None,
            node,
        }
    }

    /// Records the upstream for `slot`. Callers validate first.
    fn bind(&mut self, source: NodeId, slot: usize) {
        self.inputs[slot] = Some(source);
    }
}

/// Owns a graph of nodes and the connections between them.
///
/// Nodes are addressed through `NodeId` handles that stay stable for the
/// lifetime of the pipeline. The pipeline is move-only.
pub struct Pipeline {
    pub(crate) nodes: Vec<Option<NodeEntry>>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) events: EventBus,
    pub(crate) config: PipelineConfig,
    pub(crate) ticks: u64,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// The event buffer size is clamped to `MAX_EVENT_BUFFER_SIZE`.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            events: EventBus::new(config.event_buffer_size),
            config,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Takes ownership of `node` and returns its handle.
    pub fn create_node<N: ConcreteNode>(&mut self, node: N) -> NodeId {
        self.create_boxed(Box::new(node))
    }

    /// Same as `create_node`, for nodes built behind a trait object.
    pub fn create_boxed(&mut self, node: Box<dyn DynNode>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let name = node.name();
        tracing::debug!(node_id = %id, name = %name, "Created node");
        self.nodes.push(Some(NodeEntry::new(node)));
        self.events.node_created(id, name);
        id
    }

    /// Drops the node behind `id`. Invalid or already erased handles are ignored.
    ///
    /// Connections involving the node are kept; consumers of an erased node
    /// see their slot as closed.
    pub fn erase_node(&mut self, id: NodeId) {
        if !id.is_valid() {
            return;
        }
        if let Some(slot) = self.nodes.get_mut(id.index()) {
            if let Some(entry) = slot.take() {
                tracing::debug!(node_id = %id, name = %entry.node.name(), "Erased node");
                self.events.node_erased(id);
            }
        }
    }

    pub fn get_node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.entry(id).map(|entry| NodeRef { id, entry })
    }

    /// `true` iff `id` names a live node of this pipeline.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of live nodes in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| NodeId::from_index(index))
    }

    /// Every recorded connection, including ones whose endpoints were erased.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connects the output of `src` to input `slot` of `dst`.
    ///
    /// Checks, in order: both handles are live, the slot exists, the slot is
    /// free, and the types match. Nothing changes unless every check passes.
    pub fn connect(&mut self, src: NodeId, dst: NodeId, slot: usize) -> Result<(), PipelineError> {
        if let Err(e) = self.check_connection(src, dst, slot) {
            tracing::warn!(%src, %dst, slot, "Rejected connection: {}", e);
            return Err(e);
        }

        let dst_entry = self
            .entry_mut(dst)
            .ok_or(PipelineError::InvalidNodeId(dst))?;
        dst_entry.bind(src, slot);
        self.connections.push(Connection { src, dst, slot });

        tracing::debug!(%src, %dst, slot, "Connected nodes");
        self.events.connected(src, dst, slot);
        Ok(())
    }

    fn check_connection(&self, src: NodeId, dst: NodeId, slot: usize) -> Result<(), PipelineError> {
        let source = self.entry(src).ok_or(PipelineError::InvalidNodeId(src))?;
        let dest = self.entry(dst).ok_or(PipelineError::InvalidNodeId(dst))?;

        let arity = dest.inputs.len();
        if slot >= arity {
            return Err(PipelineError::NoSuchSlot {
                node: dst,
                slot,
                arity,
            });
        }

        if dest.inputs[slot].is_some() {
            return Err(PipelineError::SlotAlreadyUsed { node: dst, slot });
        }

        let expected = dest.input_types[slot];
        if source.output_type != Some(expected) {
            return Err(PipelineError::ConnectionTypeMismatch {
                expected,
                found: source.output_type,
            });
        }

        Ok(())
    }

    /// Live `(dst, slot)` pairs fed by `src`, in connection order.
    pub fn dependencies(&self, src: NodeId) -> Vec<(NodeId, usize)> {
        self.connections
            .iter()
            .filter(|conn| conn.src == src && self.contains(conn.dst))
            .map(|conn| (conn.dst, conn.slot))
            .collect()
    }

    /// Subscribe to pipeline events
    pub fn subscribe(&self) -> Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn entry(&self, id: NodeId) -> Option<&NodeEntry> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("nodes", &self.len())
            .field("connections", &self.connections.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}

/// Read-only view of a live node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    id: NodeId,
    entry: &'a NodeEntry,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> String {
        self.entry.node.name()
    }

    pub fn input_types(&self) -> &'a [PortType] {
        &self.entry.input_types
    }

    pub fn output_type(&self) -> Option<PortType> {
        self.entry.output_type
    }

    /// Upstream handle bound to each slot.
    pub fn inputs(&self) -> &'a [Option<NodeId>] {
        &self.entry.inputs
    }

    /// Result of the most recent poll, `None` before the first tick.
    pub fn last_poll(&self) -> Option<Poll> {
        self.entry.last_poll
    }

    pub fn is_closed(&self) -> bool {
        self.entry.last_poll == Some(Poll::Closed)
    }

    /// Access the concrete node.
    pub fn downcast_ref<N: ConcreteNode>(&self) -> Option<&'a N> {
        self.entry.node.as_any().downcast_ref::<N>()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("last_poll", &self.last_poll())
            .finish()
    }
}
