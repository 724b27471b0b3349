//! Relation view: a forest built by following one named relation
//!
//! Roots are tasks no other task points at. When every task has an incoming
//! edge (the relation is fully cyclic) every task becomes its own root.
//! Tasks that no root reaches (cycles hanging off an otherwise acyclic graph)
//! are promoted to roots afterwards so each task shows up at least once.
//!
//! Traversal is depth-first with an explicit stack. A per-root path set stops
//! descent when a step would revisit a task already on the current path; that
//! occurrence becomes a leaf marked [`Annotation::CycleReference`].

use std::collections::HashSet;

use tracing::debug;

use super::forest::{index_by_id, sort_siblings, Annotation, Forest, ForestBuilder, ForestError};
use super::graph::RelationGraph;
use super::task::{RelationKind, Task};

/// Builds a forest along one relation (e.g. `blocks`)
#[derive(Debug, Clone)]
pub struct RelationResolver {
    relation: String,
}

impl RelationResolver {
    /// Creates a resolver, rejecting malformed relation names
    pub fn new(relation: impl Into<String>) -> Result<Self, ForestError> {
        let relation = relation.into();
        let valid = !relation.is_empty()
            && relation
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

        if !valid {
            return Err(ForestError::InvalidRelation(relation));
        }
        Ok(Self { relation })
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }
}

/// One step of the explicit traversal stack
enum Step {
    Enter { pos: usize, parent: Option<usize> },
    Leave(usize),
}

impl ForestBuilder for RelationResolver {
    fn build<'a>(&self, tasks: &'a [Task]) -> Result<Forest<'a>, ForestError> {
        let index = index_by_id(tasks)?;

        let known = tasks.is_empty()
            || RelationKind::from_name(&self.relation).is_some()
            || tasks.iter().any(|t| t.relations.has(&self.relation));
        if !known {
            return Err(ForestError::UnknownRelation(self.relation.clone()));
        }

        let graph = RelationGraph::from_tasks(tasks, &index, &self.relation);
        let targets: Vec<Vec<usize>> = (0..tasks.len())
            .map(|pos| {
                let mut t = graph.targets(pos);
                sort_siblings(&mut t, tasks);
                t
            })
            .collect();

        let mut roots: Vec<usize> = (0..tasks.len()).filter(|&p| !graph.has_incoming(p)).collect();
        let fully_cyclic = roots.is_empty() && !tasks.is_empty();
        if fully_cyclic {
            debug!(relation = %self.relation, "every task has an incoming edge, rendering each as a root");
            roots = (0..tasks.len()).collect();
        }
        sort_siblings(&mut roots, tasks);

        let mut forest = Forest::new();
        let mut reached = vec![false; tasks.len()];

        for root in roots {
            expand(&mut forest, tasks, &targets, &mut reached, root);
        }

        if !fully_cyclic {
            let mut rest: Vec<usize> = (0..tasks.len()).collect();
            sort_siblings(&mut rest, tasks);
            for pos in rest {
                if !reached[pos] {
                    debug!(task = %tasks[pos].id, relation = %self.relation, "task unreachable from any root, promoting");
                    expand(&mut forest, tasks, &targets, &mut reached, pos);
                }
            }
        }

        tracing::trace!(
            relation = %self.relation,
            tasks = tasks.len(),
            edges = graph.edge_count(),
            placements = forest.len(),
            "relation forest built"
        );
        Ok(forest)
    }
}

/// Places `root` and everything reachable from it along the relation
fn expand<'a>(
    forest: &mut Forest<'a>,
    tasks: &'a [Task],
    targets: &[Vec<usize>],
    reached: &mut [bool],
    root: usize,
) {
    let mut on_path: HashSet<usize> = HashSet::new();
    let mut stack = vec![Step::Enter { pos: root, parent: None }];

    while let Some(step) = stack.pop() {
        let (pos, parent) = match step {
            Step::Leave(pos) => {
                on_path.remove(&pos);
                continue;
            }
            Step::Enter { pos, parent } => (pos, parent),
        };

        reached[pos] = true;
        let revisit = on_path.contains(&pos);
        let annotation = revisit.then_some(Annotation::CycleReference);

        let idx = match parent {
            None => forest.push_root(pos, &tasks[pos], annotation),
            Some(parent) => forest.push_child(parent, pos, &tasks[pos], annotation),
        };

        if revisit {
            debug!(task = %tasks[pos].id, "cycle reference, not descending");
            continue;
        }

        on_path.insert(pos);
        stack.push(Step::Leave(pos));
        for &child in targets[pos].iter().rev() {
            stack.push(Step::Enter {
                pos: child,
                parent: Some(idx),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, priority: Option<i64>, blocks: &[&str]) -> Task {
        let mut t = Task::new(id.parse().unwrap(), id);
        t.priority = priority;
        for target in blocks {
            t.link("blocks", target.parse().unwrap());
        }
        t
    }

    fn outline(forest: &Forest<'_>) -> Vec<String> {
        let mut lines = Vec::new();
        let mut stack: Vec<(usize, usize)> = forest.roots().iter().rev().map(|&r| (r, 0)).collect();
        while let Some((idx, depth)) = stack.pop() {
            let node = forest.node(idx);
            let marker = node.annotation.map(|a| a.to_string()).unwrap_or_default();
            lines.push(format!("{}{}{}", "  ".repeat(depth), node.task.name, marker));
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        lines
    }

    fn blocks() -> RelationResolver {
        RelationResolver::new("blocks").unwrap()
    }

    #[test]
    fn relation_name_is_validated() {
        assert!(RelationResolver::new("blocks").is_ok());
        assert!(RelationResolver::new("depends-on").is_ok());
        assert!(matches!(
            RelationResolver::new(""),
            Err(ForestError::InvalidRelation(_))
        ));
        assert!(matches!(
            RelationResolver::new("Blocks!"),
            Err(ForestError::InvalidRelation(_))
        ));
    }

    #[test]
    fn unknown_relation_is_an_error() {
        let tasks = vec![task("A", None, &["B"]), task("B", None, &[])];
        let resolver = RelationResolver::new("blcoks").unwrap();

        assert_eq!(
            resolver.build(&tasks).unwrap_err(),
            ForestError::UnknownRelation("blcoks".to_string())
        );
    }

    #[test]
    fn well_known_relation_without_edges_is_fine() {
        let tasks = vec![task("A", None, &[]), task("B", None, &[])];
        let resolver = RelationResolver::new("duplicates").unwrap();

        let forest = resolver.build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["A", "B"]);
    }

    #[test]
    fn chain_renders_as_path() {
        let tasks = vec![
            task("C", None, &[]),
            task("B", None, &["C"]),
            task("A", None, &["B"]),
        ];

        let forest = blocks().build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["A", "  B", "    C"]);
    }

    #[test]
    fn shared_target_appears_under_each_source() {
        let tasks = vec![
            task("A", Some(1), &["C"]),
            task("B", Some(2), &["C"]),
            task("C", None, &[]),
        ];

        let forest = blocks().build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["A", "  C", "B", "  C"]);
    }

    #[test]
    fn two_cycle_terminates() {
        let tasks = vec![task("A", None, &["B"]), task("B", None, &["A"])];

        let forest = blocks().build(&tasks).unwrap();
        assert_eq!(
            outline(&forest),
            vec![
                "A",
                "  B",
                "    A[cycle-reference]",
                "B",
                "  A",
                "    B[cycle-reference]",
            ]
        );
    }

    #[test]
    fn self_loop_is_a_cycle_reference() {
        let tasks = vec![task("A", None, &["A"])];

        let forest = blocks().build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["A", "  A[cycle-reference]"]);
    }

    #[test]
    fn unreached_cycle_is_promoted() {
        // R -> X is acyclic; P <-> Q is a cycle nothing else reaches
        let tasks = vec![
            task("R", Some(1), &["X"]),
            task("X", None, &[]),
            task("P", Some(2), &["Q"]),
            task("Q", Some(3), &["P"]),
        ];

        let forest = blocks().build(&tasks).unwrap();
        assert_eq!(
            outline(&forest),
            vec!["R", "  X", "P", "  Q", "    P[cycle-reference]"]
        );
    }

    #[test]
    fn cycle_below_root_is_contained() {
        let tasks = vec![
            task("R", None, &["A"]),
            task("A", None, &["B"]),
            task("B", None, &["A"]),
        ];

        let forest = blocks().build(&tasks).unwrap();
        assert_eq!(
            outline(&forest),
            vec!["R", "  A", "    B", "      A[cycle-reference]"]
        );
    }

    #[test]
    fn duplicate_ids_fail() {
        let tasks = vec![task("A", None, &[]), task("A", None, &[])];
        assert!(matches!(
            blocks().build(&tasks),
            Err(ForestError::DuplicateId(_))
        ));
    }

    #[test]
    fn dense_cycle_stays_bounded() {
        // Ring of n tasks: every task blocks the next
        let n = 200;
        let tasks: Vec<Task> = (0..n)
            .map(|i| {
                let next = format!("n{}", (i + 1) % n);
                task(&format!("n{}", i), None, &[next.as_str()])
            })
            .collect();

        let forest = blocks().build(&tasks).unwrap();
        // Fully cyclic: n roots, each walking the ring once plus a cycle reference
        assert_eq!(forest.roots().len(), n);
        assert_eq!(forest.len(), n * (n + 1));
    }
}
