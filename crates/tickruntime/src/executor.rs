use std::collections::HashSet;

use tickcore::{NodeId, Poll, SlotState};

use crate::pipeline::Pipeline;

/// Scheduling: one tick polls every live node once, in creation order.
impl Pipeline {
    /// Performs one tick and reports whether the pipeline is complete.
    ///
    /// A node sees upstream nodes created before it with this tick's result
    /// and later ones with the previous tick's result, so each consumer
    /// observes every upstream result exactly once. Nodes that have closed
    /// are not polled again.
    pub fn step(&mut self) -> bool {
        self.ticks += 1;
        let tick = self.ticks;
        let _span = tracing::trace_span!("tick", tick).entered();

        for index in 0..self.nodes.len() {
            let Some(mut entry) = self.nodes[index].take() else {
                continue;
            };

            if entry.last_poll != Some(Poll::Closed) {
                let poll = {
                    let slots: Vec<SlotState<'_>> = entry
                        .inputs
                        .iter()
                        .map(|binding| self.slot_state(index, *binding))
                        .collect();
                    entry.node.poll_dyn(&slots)
                };

                let id = NodeId::from_index(index);
                tracing::trace!(node_id = %id, ?poll, "Polled node");
                if poll == Poll::Closed {
                    tracing::debug!(node_id = %id, tick, "Node closed");
                    self.events.node_closed(id, tick);
                }
                entry.last_poll = Some(poll);
            }

            self.nodes[index] = Some(entry);
        }

        let complete = self.is_complete();
        if complete {
            tracing::info!(ticks = tick, "Pipeline completed");
            self.events.completed(tick);
        }
        complete
    }

    /// Steps until the pipeline is complete.
    pub fn run(&mut self) {
        while !self.step() {}
    }

    /// Steps until the pipeline is complete or `max_ticks` ticks have been
    /// performed by this call. Returns whether completion was reached.
    pub fn run_for(&mut self, max_ticks: u64) -> bool {
        for _ in 0..max_ticks {
            if self.step() {
                return true;
            }
        }
        false
    }

    /// `run` or `run_for`, depending on the configured tick limit.
    pub fn run_configured(&mut self) -> bool {
        match self.config.max_ticks {
            Some(max_ticks) => self.run_for(max_ticks),
            None => {
                self.run();
                true
            }
        }
    }

    /// Number of ticks performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// `true` when every terminal node has closed.
    ///
    /// A terminal node has no outgoing connection to a live node. An empty
    /// pipeline is complete.
    pub fn is_complete(&self) -> bool {
        let feeding: HashSet<NodeId> = self
            .connections
            .iter()
            .filter(|conn| self.contains(conn.dst))
            .map(|conn| conn.src)
            .collect();

        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|entry| (index, entry)))
            .filter(|(index, _)| !feeding.contains(&NodeId::from_index(*index)))
            .all(|(_, entry)| entry.last_poll == Some(Poll::Closed))
    }

    /// What the node at `current` sees on a slot bound to `binding`.
    fn slot_state(&self, current: usize, binding: Option<NodeId>) -> SlotState<'_> {
        let Some(source) = binding else {
            return SlotState::Closed;
        };
        // The node being polled is out of the table; a self-loop reads empty.
        if source.index() == current {
            return SlotState::Empty;
        }
        match self.entry(source) {
            None => SlotState::Closed,
            Some(upstream) => match upstream.last_poll {
                Some(Poll::Ready) => upstream
                    .node
                    .value_dyn()
                    .map_or(SlotState::Empty, SlotState::Ready),
                Some(Poll::Closed) => SlotState::Closed,
                Some(Poll::Empty) | None => SlotState::Empty,
            },
        }
    }
}
