//! Relation graph for tasks
//!
//! One directed graph per relation name: an edge `a -> b` means task `a`
//! lists `b` under that relation (e.g. `a` blocks `b`). Cycles are allowed;
//! the relation resolver contains them during traversal.
//! Uses petgraph for graph operations.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::debug;

use super::id::TaskId;
use super::task::Task;

/// A directed graph over snapshot positions for one relation
#[derive(Debug)]
pub struct RelationGraph {
    /// Node weights are snapshot positions; node `i` is position `i`
    graph: DiGraph<usize, ()>,
}

impl RelationGraph {
    /// Builds the graph of `relation` from a snapshot
    ///
    /// `index` maps IDs to snapshot positions. Targets naming unknown IDs are
    /// skipped.
    pub fn from_tasks(tasks: &[Task], index: &HashMap<&TaskId, usize>, relation: &str) -> Self {
        let mut graph = DiGraph::with_capacity(tasks.len(), 0);

        for pos in 0..tasks.len() {
            graph.add_node(pos);
        }

        for (pos, task) in tasks.iter().enumerate() {
            for target in task.targets(relation) {
                match index.get(target) {
                    Some(&to) => {
                        let (from, to) = (NodeIndex::new(pos), NodeIndex::new(to));
                        if graph.find_edge(from, to).is_none() {
                            graph.add_edge(from, to, ());
                        }
                    }
                    None => {
                        debug!(task = %task.id, %relation, target = %target, "relation target not found, skipping");
                    }
                }
            }
        }

        Self { graph }
    }

    /// Returns true if some *other* task points at `pos`
    pub fn has_incoming(&self, pos: usize) -> bool {
        let node = NodeIndex::new(pos);
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .any(|source| source != node)
    }

    /// Returns the positions `pos` points at (unordered)
    pub fn targets(&self, pos: usize) -> Vec<usize> {
        self.graph
            .neighbors_directed(NodeIndex::new(pos), Direction::Outgoing)
            .filter_map(|idx| self.graph.node_weight(idx).copied())
            .collect()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
