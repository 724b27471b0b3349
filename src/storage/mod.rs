//! # Storage Layer
//!
//! Persistence for task records, kept in git-friendly text files.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line) | `.tasktree/tasks.jsonl` |
//! | Config | TOML | `.tasktree/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TaskStore`] uses file locking (`fs2`) for concurrent access
//! - Full rewrites are atomic (temp file + rename)
//! - A render works on the `Vec<Task>` returned by one
//!   [`TaskStore::read_all`] call, so later writes never show up mid-render
//!
//! ## Project Structure
//!
//! ```text
//! .tasktree/
//! ├── tasks.jsonl           # All tasks in JSONL format
//! └── config.toml           # Project configuration
//! ```

mod jsonl;
mod config;
mod project;

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".tasktree";

pub use jsonl::TaskStore;
pub use config::{ColorChoice, Config, ConfigError, GlobalConfig, ProjectConfig, TreeConfig, MAX_INDENT};
pub use project::{Project, ProjectError};
