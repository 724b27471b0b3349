//! Domain models for tasktree
//!
//! Contains the task records and the forest resolvers, without any I/O concerns.

mod id;
mod task;
mod graph;
mod forest;
mod hierarchy;
mod relation;

pub use id::{IdError, TaskId, MAX_ID_LEN};
pub use task::{Comment, RelationKind, Relations, Task, TaskKind, TaskStatus};
pub use graph::RelationGraph;
pub use forest::{
    index_by_id, sibling_order, sort_siblings, Annotation, Forest, ForestBuilder, ForestError,
    ForestNode,
};
pub use hierarchy::HierarchyResolver;
pub use relation::RelationResolver;
