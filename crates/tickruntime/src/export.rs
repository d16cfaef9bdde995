use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use tickcore::{Node, NodeId};

use crate::pipeline::Pipeline;

impl Pipeline {
    /// Graph view of the live nodes, edge weights are destination slots.
    ///
    /// Connections touching an erased node are left out. Node indices follow
    /// creation order.
    pub fn graph(&self) -> DiGraph<NodeId, usize> {
        let mut graph = DiGraph::new();
        let mut node_to_index: HashMap<NodeId, NodeIndex> = HashMap::new();

        for id in self.node_ids() {
            let idx = graph.add_node(id);
            node_to_index.insert(id, idx);
        }

        for conn in &self.connections {
            if let (Some(from_idx), Some(to_idx)) =
                (node_to_index.get(&conn.src), node_to_index.get(&conn.dst))
            {
                graph.add_edge(*from_idx, *to_idx, conn.slot);
            }
        }

        graph
    }

    /// Renders the pipeline in DOT format.
    pub fn to_dot(&self) -> String {
        self.to_string()
    }

    /// Quoted-string body for a node, with `"` and `\` escaped.
    fn label(&self, id: NodeId) -> String {
        let label = match self.entry(id) {
            Some(entry) => format!("{} {}", id, entry.node.name()),
            None => id.to_string(),
        };
        escape_dot(&label)
    }
}

fn escape_dot(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph();

        writeln!(f, "digraph G {{")?;
        for idx in graph.node_indices() {
            writeln!(f, "  \"{}\"", self.label(graph[idx]))?;
        }

        writeln!(f)?;

        for edge in graph.raw_edges() {
            writeln!(
                f,
                "  \"{}\" -> \"{}\"",
                self.label(graph[edge.source()]),
                self.label(graph[edge.target()])
            )?;
        }
        writeln!(f, "}}")
    }
}
