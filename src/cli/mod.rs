//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init` |
//! | Records | Task CRUD | `add`, `list`, `show`, `status`, `comment`, `link`, `unlink` |
//! | Render | Tree output | `tree`, `tree --relation blocks` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON (`tree` prints `{"lines": [...]}`)
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `-v` enables debug events
//! (orphans, cycles, skipped relation targets), `-vv` trace events;
//! `RUST_LOG` overrides both.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod task;
mod tree;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
pub use tree::TreeArgs;
