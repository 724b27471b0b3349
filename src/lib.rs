//! tasktree - render task records as aligned, box-drawn terminal trees
//!
//! Tasks live in a JSONL store and point at a parent task and/or at other
//! tasks through named relations (`blocks`, `related`, ...). The renderer
//! turns a snapshot of them into text lines, either as the parent/child
//! hierarchy or as a tree along one relation:
//!
//! ```
//! use tasktree_cli::{render, RenderConfig, Task};
//!
//! let parent = Task::new("T1".parse().unwrap(), "Parent").with_priority(1);
//! let child = Task::new("T2".parse().unwrap(), "Child")
//!     .with_priority(2)
//!     .with_parent("T1".parse().unwrap());
//!
//! let lines = render(&[parent, child], &RenderConfig::default()).unwrap();
//! assert_eq!(lines, vec!["└─ Parent", "   └─ Child"]);
//! ```

pub mod domain;
pub mod render;
pub mod storage;
pub mod cli;

pub use domain::{Task, TaskId, TaskStatus};
pub use render::{render, render_to_string, RenderConfig, RenderError};
