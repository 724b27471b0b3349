//! Resolved forests of tasks
//!
//! A [`Forest`] is an arena of placed nodes. Each placement borrows its task
//! from the caller's snapshot, so the same task may be placed several times
//! (relation view) without copying it. Forests are built fresh per render call.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use super::id::TaskId;
use super::task::Task;

/// Marker for a node placed somewhere unusual during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// Parent ID is not in the input set
    Orphan,
    /// Node closes a parent-pointer cycle and was lifted to a root
    CyclicHierarchy,
    /// Relation traversal reached a node already on the current path
    CycleReference,
}

impl Annotation {
    pub fn label(&self) -> &'static str {
        match self {
            Annotation::Orphan => "orphan",
            Annotation::CyclicHierarchy => "cyclic-hierarchy",
            Annotation::CycleReference => "cycle-reference",
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label())
    }
}

/// One placement of a task in a forest
#[derive(Debug)]
pub struct ForestNode<'a> {
    pub task: &'a Task,
    /// Position of the task in the input snapshot
    pub position: usize,
    pub annotation: Option<Annotation>,
    /// Arena indices of children, already in sibling order
    pub children: Vec<usize>,
}

/// Ordered roots plus an arena of placed nodes
#[derive(Debug, Default)]
pub struct Forest<'a> {
    nodes: Vec<ForestNode<'a>>,
    roots: Vec<usize>,
}

impl<'a> Forest<'a> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Places a task and returns its arena index
    pub fn place(
        &mut self,
        position: usize,
        task: &'a Task,
        annotation: Option<Annotation>,
    ) -> usize {
        self.nodes.push(ForestNode {
            task,
            position,
            annotation,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Places a task as the next root
    pub fn push_root(
        &mut self,
        position: usize,
        task: &'a Task,
        annotation: Option<Annotation>,
    ) -> usize {
        let idx = self.place(position, task, annotation);
        self.roots.push(idx);
        idx
    }

    /// Places a task as the next child of `parent`
    pub fn push_child(
        &mut self,
        parent: usize,
        position: usize,
        task: &'a Task,
        annotation: Option<Annotation>,
    ) -> usize {
        let idx = self.place(position, task, annotation);
        self.nodes[parent].children.push(idx);
        idx
    }

    pub fn node(&self, idx: usize) -> &ForestNode<'a> {
        &self.nodes[idx]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Number of placements (a task placed twice counts twice)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builds a forest from a flat snapshot of tasks
///
/// The hierarchy view and the relation view are two implementations of this
/// trait; the renderer picks one from its configuration.
pub trait ForestBuilder {
    fn build<'a>(&self, tasks: &'a [Task]) -> Result<Forest<'a>, ForestError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ForestError {
    #[error("Duplicate task ID: {0}")]
    DuplicateId(TaskId),

    #[error("Invalid relation name '{0}': use lowercase letters, digits, '-' or '_'")]
    InvalidRelation(String),

    #[error("Unknown relation '{0}': no task uses it")]
    UnknownRelation(String),
}

/// Maps every ID to its position in the snapshot, rejecting duplicates
pub fn index_by_id(tasks: &[Task]) -> Result<HashMap<&TaskId, usize>, ForestError> {
    let mut index = HashMap::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        if index.insert(&task.id, i).is_some() {
            return Err(ForestError::DuplicateId(task.id.clone()));
        }
    }
    Ok(index)
}

/// Sibling order: priority ascending (missing last), then name ignoring case
pub fn sibling_order(a: &Task, b: &Task) -> Ordering {
    let by_priority = match (a.priority, b.priority) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_priority.then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// Sorts snapshot positions into sibling order (stable on full ties)
pub fn sort_siblings(positions: &mut [usize], tasks: &[Task]) {
    positions.sort_by(|&a, &b| sibling_order(&tasks[a], &tasks[b]));
}

#[cfg(test)]
pub(crate) fn placed_positions(forest: &Forest<'_>) -> std::collections::HashSet<usize> {
    (0..forest.len()).map(|idx| forest.node(idx).position).collect()
}
