//! Render configuration
//!
//! A [`RenderConfig`] is built once by the caller (the CLI merges flags over
//! the project `[tree]` table) and passed by reference to every stage.

use serde::{Deserialize, Serialize};

/// Default wrap column for descriptions
pub const DEFAULT_DESCRIPTION_LENGTH: usize = 80;

/// Default raw-character limit before a description is truncated
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 500;

/// Default padding after each connector column
pub const DEFAULT_INDENT_UNIT: &str = "  ";

/// How tags are rendered in the header line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagStyle {
    /// `#tag` in the same style as the name
    #[default]
    Plain,
    /// `#tag` with a per-tag color (only when colorize is on)
    Colored,
}

/// Everything a render call needs to know besides the records
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub colorize: bool,
    pub show_ids: bool,
    pub show_score: bool,
    pub show_tags: bool,
    pub tag_style: TagStyle,
    pub show_type_emoji: bool,
    /// Status and priority badge
    pub show_status: bool,
    pub show_descriptions: bool,
    /// Wrap column for description lines; 0 disables wrapping
    pub description_length: usize,
    /// Raw descriptions longer than this are cut and end in `…`; 0 disables
    pub max_description_length: usize,
    /// Number of most recent comments shown per task
    pub show_comments: usize,
    pub show_dates: bool,
    /// Padding after each connector column; its width plus one is the width
    /// of one prefix unit
    pub indent_unit: String,
    /// Render the relation view instead of the parent/child hierarchy
    pub dependency_as_tree: bool,
    /// Relation followed by the relation view
    pub dependency_type: Option<String>,
    /// Check the rendered lines for broken vertical connectors
    pub validate_pipes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            colorize: false,
            show_ids: false,
            show_score: false,
            show_tags: false,
            tag_style: TagStyle::default(),
            show_type_emoji: false,
            show_status: false,
            show_descriptions: false,
            description_length: DEFAULT_DESCRIPTION_LENGTH,
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
            show_comments: 0,
            show_dates: false,
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
            dependency_as_tree: false,
            dependency_type: None,
            validate_pipes: false,
        }
    }
}

impl RenderConfig {
    /// Switches to the relation view along `relation`
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.dependency_as_tree = true;
        self.dependency_type = Some(relation.into());
        self
    }

    /// Sets the indent unit to `width` spaces
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_unit = " ".repeat(width);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert!(!config.colorize);
        assert!(!config.dependency_as_tree);
        assert_eq!(config.description_length, 80);
        assert_eq!(config.indent_unit, "  ");
        assert_eq!(config.show_comments, 0);
    }

    #[test]
    fn relation_builder() {
        let config = RenderConfig::default().with_relation("blocks");
        assert!(config.dependency_as_tree);
        assert_eq!(config.dependency_type.as_deref(), Some("blocks"));
    }

    #[test]
    fn tag_style_serde() {
        let style: TagStyle = serde_json::from_str(r#""colored""#).unwrap();
        assert_eq!(style, TagStyle::Colored);
    }
}
