//! Hierarchy view: a forest built from parent pointers
//!
//! - Tasks without a parent are roots.
//! - Tasks whose parent ID is missing from the snapshot become roots marked
//!   [`Annotation::Orphan`].
//! - A parent chain that loops back on itself is cut at one member, which is
//!   lifted to a root marked [`Annotation::CyclicHierarchy`]; the rest of the
//!   cycle (and anything hanging below it) renders beneath that root.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::forest::{
    index_by_id, sibling_order, sort_siblings, Annotation, Forest, ForestBuilder, ForestError,
};
use super::id::TaskId;
use super::task::Task;

/// Builds the parent/child forest
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyResolver;

impl ForestBuilder for HierarchyResolver {
    fn build<'a>(&self, tasks: &'a [Task]) -> Result<Forest<'a>, ForestError> {
        let index = index_by_id(tasks)?;

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        let mut roots: Vec<(usize, Option<Annotation>)> = Vec::new();

        for (pos, task) in tasks.iter().enumerate() {
            match &task.parent {
                None => roots.push((pos, None)),
                Some(parent_id) => match index.get(parent_id) {
                    Some(&parent) => children[parent].push(pos),
                    None => {
                        debug!(task = %task.id, parent = %parent_id, "parent not found, placing as orphan root");
                        roots.push((pos, Some(Annotation::Orphan)));
                    }
                },
            }
        }

        for cycle in find_cycles(tasks, &index) {
            let Some(&lifted) = cycle
                .iter()
                .min_by(|&&a, &&b| sibling_order(&tasks[a], &tasks[b]))
            else {
                continue;
            };
            debug!(
                task = %tasks[lifted].id,
                members = cycle.len(),
                "parent cycle detected, lifting member to root"
            );
            roots.push((lifted, Some(Annotation::CyclicHierarchy)));
        }

        for list in &mut children {
            sort_siblings(list, tasks);
        }
        roots.sort_by(|a, b| sibling_order(&tasks[a.0], &tasks[b.0]));

        let mut forest = Forest::new();
        let mut placed = vec![false; tasks.len()];

        for (pos, annotation) in roots {
            if placed[pos] {
                continue;
            }
            placed[pos] = true;
            let root = forest.push_root(pos, &tasks[pos], annotation);

            let mut stack = vec![(root, pos)];
            while let Some((arena, pos)) = stack.pop() {
                for &child in &children[pos] {
                    // The lifted member of a cycle is reached again from its
                    // predecessor; it is already placed as a root.
                    if placed[child] {
                        continue;
                    }
                    placed[child] = true;
                    let idx = forest.push_child(arena, child, &tasks[child], None);
                    stack.push((idx, child));
                }
            }
        }

        Ok(forest)
    }
}

/// Finds every parent-pointer cycle, as lists of snapshot positions
fn find_cycles(tasks: &[Task], index: &HashMap<&TaskId, usize>) -> Vec<Vec<usize>> {
    let mut done = vec![false; tasks.len()];
    let mut cycles = Vec::new();

    for start in 0..tasks.len() {
        if done[start] {
            continue;
        }

        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        let mut current = Some(start);

        while let Some(pos) = current {
            if done[pos] {
                break;
            }
            if on_path.contains(&pos) {
                if let Some(from) = path.iter().position(|&p| p == pos) {
                    cycles.push(path[from..].to_vec());
                }
                break;
            }

            on_path.insert(pos);
            path.push(pos);
            current = tasks[pos]
                .parent
                .as_ref()
                .and_then(|parent| index.get(parent).copied());
        }

        for pos in path {
            done[pos] = true;
        }
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, name: &str, priority: Option<i64>, parent: Option<&str>) -> Task {
        let mut t = Task::new(id.parse().unwrap(), name);
        t.priority = priority;
        t.parent = parent.map(|p| p.parse().unwrap());
        t
    }

    /// Renders a forest as `name(annotation)` lines indented by depth
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

    #[test]
    fn parent_and_child() {
        let tasks = vec![
            task("T2", "Child", Some(2), Some("T1")),
            task("T1", "Parent", Some(1), None),
        ];

        let forest = HierarchyResolver.build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["Parent", "  Child"]);
    }

    #[test]
    fn children_are_sorted() {
        let tasks = vec![
            task("R", "Root", None, None),
            task("c", "charlie", None, Some("R")),
            task("a", "Alpha", Some(5), Some("R")),
            task("b", "bravo", None, Some("R")),
            task("z", "zulu", Some(1), Some("R")),
        ];

        let forest = HierarchyResolver.build(&tasks).unwrap();
        assert_eq!(
            outline(&forest),
            vec!["Root", "  zulu", "  Alpha", "  bravo", "  charlie"]
        );
    }

    #[test]
    fn orphan_becomes_annotated_root() {
        let tasks = vec![
            task("T1", "Parent", Some(1), None),
            task("T9", "Lost", Some(2), Some("missing")),
        ];

        let forest = HierarchyResolver.build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["Parent", "Lost[orphan]"]);
    }

    #[test]
    fn orphan_keeps_its_subtree() {
        let tasks = vec![
            task("T9", "Lost", None, Some("missing")),
            task("T10", "Found", None, Some("T9")),
        ];

        let forest = HierarchyResolver.build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["Lost[orphan]", "  Found"]);
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let tasks = vec![task("T1", "Loop", None, Some("T1"))];

        let forest = HierarchyResolver.build(&tasks).unwrap();
        assert_eq!(outline(&forest), vec!["Loop[cyclic-hierarchy]"]);
    }

    #[test]
    fn cycle_is_rendered_once_under_lifted_root() {
        // A -> B -> C -> A (parent pointers), D hangs below C
        let tasks = vec![
            task("A", "a", Some(1), Some("B")),
            task("B", "b", Some(2), Some("C")),
            task("C", "c", Some(3), Some("A")),
            task("D", "d", None, Some("C")),
            task("R", "root", Some(0), None),
        ];

        let forest = HierarchyResolver.build(&tasks).unwrap();
        assert_eq!(
            outline(&forest),
            vec!["root", "a[cyclic-hierarchy]", "  c", "    b", "    d"]
        );
        assert_eq!(forest.len(), tasks.len());
    }

    #[test]
    fn every_task_is_placed_exactly_once() {
        let tasks = vec![
            task("A", "a", None, Some("B")),
            task("B", "b", None, Some("A")),
            task("C", "c", None, None),
            task("D", "d", None, Some("C")),
            task("E", "e", None, Some("nowhere")),
        ];

        let forest = HierarchyResolver.build(&tasks).unwrap();
        let placed = super::super::forest::placed_positions(&forest);

        assert_eq!(forest.len(), tasks.len());
        assert_eq!(placed.len(), tasks.len());
    }

    #[test]
    fn duplicate_ids_fail() {
        let tasks = vec![task("T1", "a", None, None), task("T1", "b", None, None)];
        assert!(matches!(
            HierarchyResolver.build(&tasks),
            Err(ForestError::DuplicateId(_))
        ));
    }

    #[test]
    fn deep_chain_builds_without_recursion() {
        let depth = 50_000;
        let tasks: Vec<Task> = (0..depth)
            .map(|i| {
                let parent = (i > 0).then(|| format!("n{}", i - 1));
                task(&format!("n{}", i), &format!("node {}", i), None, parent.as_deref())
            })
            .collect();

        let forest = HierarchyResolver.build(&tasks).unwrap();
        assert_eq!(forest.len(), depth);
        assert_eq!(forest.roots().len(), 1);
    }
}
