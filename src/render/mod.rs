//! Tree rendering
//!
//! A render call is a pure function of a task snapshot and a [`RenderConfig`]:
//!
//! 1. A [`ForestBuilder`] (hierarchy or relation view, picked from the config)
//!    resolves the flat records into a forest.
//! 2. The assembler walks the forest pre-order, asking the connector engine
//!    for prefixes and the content formatter for each node's lines.
//! 3. Optionally the result is checked for broken vertical connectors.
//!
//! Any error aborts the call with no output.

mod assemble;
mod config;
mod connector;
mod content;
mod style;
mod text;

use tracing::trace;

use crate::domain::{ForestBuilder, ForestError, HierarchyResolver, RelationResolver, Task};

pub use assemble::{assemble, validate, RenderedLine};
pub use config::{
    RenderConfig, TagStyle, DEFAULT_DESCRIPTION_LENGTH, DEFAULT_INDENT_UNIT,
    DEFAULT_MAX_DESCRIPTION_LENGTH,
};
pub use connector::{prefixes, Glyphs, Prefixes};
pub use content::content_block;
pub use style::Painter;
pub use text::{truncate_chars, visible_chars, visible_width, wrap_words, ELLIPSIS};

/// Errors that abort a render call
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Forest(#[from] ForestError),

    #[error("Relation view requested without a relation name")]
    MissingRelation,

    #[error("Connector check failed: '│' at line {line}, column {column} has nothing above it")]
    MisalignedPipe { line: usize, column: usize },

    #[error("Connector check failed: prefix at line {line} is {found} columns wide, expected {expected}")]
    MisalignedPrefix {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Picks the forest builder for the configured view
pub fn select_builder(config: &RenderConfig) -> Result<Box<dyn ForestBuilder>, RenderError> {
    if !config.dependency_as_tree {
        return Ok(Box::new(HierarchyResolver));
    }

    let relation = config
        .dependency_type
        .as_deref()
        .ok_or(RenderError::MissingRelation)?;
    Ok(Box::new(RelationResolver::new(relation)?))
}

/// Renders tasks into display lines
pub fn render(tasks: &[Task], config: &RenderConfig) -> Result<Vec<String>, RenderError> {
    let builder = select_builder(config)?;
    let forest = builder.build(tasks)?;
    if forest.is_empty() {
        trace!("nothing to render");
        return Ok(Vec::new());
    }

    let lines = assemble(&forest, config);

    if config.validate_pipes {
        validate(&lines, config)?;
    }

    trace!(
        tasks = tasks.len(),
        placements = forest.len(),
        lines = lines.len(),
        "render complete"
    );
    Ok(lines.iter().map(RenderedLine::text).collect())
}

/// Renders tasks into one newline-joined string
pub fn render_to_string(tasks: &[Task], config: &RenderConfig) -> Result<String, RenderError> {
    Ok(render(tasks, config)?.join("\n"))
}
