use petgraph::algo::{connected_components, is_cyclic_directed};
use tickcore::ValidationError;

use crate::pipeline::Pipeline;

impl Pipeline {
    /// Checks that the pipeline forms a single runnable dataflow.
    ///
    /// Every slot is bound to a live node, every producing node has a
    /// consumer, there is at least one source and one sink, the graph is one
    /// connected piece and it has no cycles.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut has_source = false;
        let mut has_sink = false;

        for id in self.node_ids() {
            let Some(entry) = self.entry(id) else {
                continue;
            };

            if let Some(slot) = entry
                .inputs
                .iter()
                .position(|binding| !binding.is_some_and(|src| self.contains(src)))
            {
                return Err(ValidationError::UnfilledSlot { node: id, slot });
            }

            if entry.output_type.is_some() && self.dependencies(id).is_empty() {
                return Err(ValidationError::NoConsumer(id));
            }

            has_source |= entry.inputs.is_empty();
            has_sink |= entry.output_type.is_none();
        }

        if !has_source {
            return Err(ValidationError::NoSource);
        }
        if !has_sink {
            return Err(ValidationError::NoSink);
        }

        let graph = self.graph();
        if connected_components(&graph) > 1 {
            return Err(ValidationError::Disconnected);
        }
        if is_cyclic_directed(&graph) {
            return Err(ValidationError::Cycle);
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
