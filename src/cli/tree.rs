//! `tree` command: renders the task store as a box-drawn tree

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::output::Output;
use crate::render::{render, RenderConfig, TagStyle};
use crate::storage::{ColorChoice, ConfigError, Project, TreeConfig, MAX_INDENT};

/// Flags of the `tree` command; each one overrides the project `[tree]` table
#[derive(Debug, Default, Args)]
pub struct TreeArgs {
    /// Show task IDs
    #[arg(long, overrides_with = "no_ids")]
    pub ids: bool,

    /// Hide task IDs
    #[arg(long, overrides_with = "ids")]
    pub no_ids: bool,

    /// Show scores
    #[arg(long, overrides_with = "no_score")]
    pub score: bool,

    /// Hide scores
    #[arg(long, overrides_with = "score")]
    pub no_score: bool,

    /// Show tags
    #[arg(long, overrides_with = "no_tags")]
    pub tags: bool,

    /// Hide tags
    #[arg(long, overrides_with = "tags")]
    pub no_tags: bool,

    /// How tags are drawn
    #[arg(long, value_enum)]
    pub tag_style: Option<TagStyle>,

    /// Show a glyph for the task type
    #[arg(long, overrides_with = "no_emoji")]
    pub emoji: bool,

    /// Hide type glyphs
    #[arg(long, overrides_with = "emoji")]
    pub no_emoji: bool,

    /// Show descriptions below each task
    #[arg(long, overrides_with = "no_descriptions")]
    pub descriptions: bool,

    /// Hide descriptions
    #[arg(long, overrides_with = "descriptions")]
    pub no_descriptions: bool,

    /// Wrap column for descriptions (0 = no wrapping)
    #[arg(long)]
    pub description_length: Option<usize>,

    /// Show the N most recent comments per task
    #[arg(long, value_name = "N")]
    pub comments: Option<usize>,

    /// Show creation dates
    #[arg(long, overrides_with = "no_dates")]
    pub dates: bool,

    /// Hide creation dates
    #[arg(long, overrides_with = "dates")]
    pub no_dates: bool,

    /// Show status and priority
    #[arg(long, overrides_with = "no_status")]
    pub status: bool,

    /// Hide status and priority
    #[arg(long, overrides_with = "status")]
    pub no_status: bool,

    /// Spaces after each connector column
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Follow a relation (e.g. blocks) instead of parent links
    #[arg(long, value_name = "NAME", conflicts_with = "hierarchy")]
    pub relation: Option<String>,

    /// Use parent links even if a default relation is configured
    #[arg(long)]
    pub hierarchy: bool,

    /// Check connector alignment of the output
    #[arg(long, overrides_with = "no_validate_pipes")]
    pub validate_pipes: bool,

    /// Skip the connector alignment check
    #[arg(long, overrides_with = "validate_pipes")]
    pub no_validate_pipes: bool,

    /// When to use color
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,
}

impl TreeArgs {
    /// Applies the flags on top of configured defaults
    pub fn merge(&self, defaults: &TreeConfig) -> Result<TreeConfig, ConfigError> {
        let mut tree = defaults.clone();

        toggle(&mut tree.ids, self.ids, self.no_ids);
        toggle(&mut tree.score, self.score, self.no_score);
        toggle(&mut tree.tags, self.tags, self.no_tags);
        toggle(&mut tree.emoji, self.emoji, self.no_emoji);
        toggle(&mut tree.descriptions, self.descriptions, self.no_descriptions);
        toggle(&mut tree.dates, self.dates, self.no_dates);
        toggle(&mut tree.status, self.status, self.no_status);
        toggle(&mut tree.validate_pipes, self.validate_pipes, self.no_validate_pipes);

        if let Some(style) = self.tag_style {
            tree.tag_style = style;
        }
        if let Some(length) = self.description_length {
            tree.description_length = length;
        }
        if let Some(count) = self.comments {
            tree.comments = count;
        }
        if let Some(indent) = self.indent {
            tree.indent = indent;
        }
        if self.hierarchy {
            tree.relation = None;
        } else if let Some(relation) = &self.relation {
            tree.relation = Some(relation.clone());
        }

        if tree.indent > MAX_INDENT {
            return Err(ConfigError::Invalid(format!(
                "--indent must be at most {}",
                MAX_INDENT
            )));
        }
        Ok(tree)
    }
}

/// `--x` turns an option on, `--no-x` turns it off, neither keeps the default
fn toggle(value: &mut bool, on: bool, off: bool) {
    if on {
        *value = true;
    } else if off {
        *value = false;
    }
}

pub fn run(output: &Output, args: &TreeArgs) -> Result<()> {
    let project = Project::open_current()?;
    let config = project.config();

    let tree = args.merge(&config.project.tree)?;
    let colorize = !output.is_json() && args.color.unwrap_or(config.color()).enabled();
    let render_config: RenderConfig = tree.to_render_config(colorize);
    debug!(?render_config, "rendering tree");

    // One read is the snapshot for the whole render
    let tasks = project.task_store().read_all()?;
    let lines = render(&tasks, &render_config).context("Failed to render task tree")?;

    if lines.is_empty() && !output.is_json() {
        output.success("No tasks");
        return Ok(());
    }
    output.lines(&lines);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let defaults = TreeConfig {
            comments: 2,
            relation: Some("blocks".to_string()),
            ..TreeConfig::default()
        };
        let args = TreeArgs {
            ids: true,
            comments: Some(5),
            indent: Some(4),
            ..TreeArgs::default()
        };

        let tree = args.merge(&defaults).unwrap();
        assert!(tree.ids);
        assert_eq!(tree.comments, 5);
        assert_eq!(tree.indent, 4);
        assert_eq!(tree.relation.as_deref(), Some("blocks"));
    }

    #[test]
    fn defaults_survive_without_flags() {
        let defaults = TreeConfig {
            descriptions: true,
            ..TreeConfig::default()
        };

        let tree = TreeArgs::default().merge(&defaults).unwrap();
        assert_eq!(tree, defaults);
    }

    #[test]
    fn negated_flags_turn_off_configured_options() {
        let defaults = TreeConfig {
            ids: true,
            descriptions: true,
            ..TreeConfig::default()
        };
        let args = TreeArgs {
            no_ids: true,
            ..TreeArgs::default()
        };

        let tree = args.merge(&defaults).unwrap();
        assert!(!tree.ids);
        assert!(tree.descriptions);
    }

    #[test]
    fn hierarchy_flag_clears_relation() {
        let defaults = TreeConfig {
            relation: Some("blocks".to_string()),
            ..TreeConfig::default()
        };
        let args = TreeArgs {
            hierarchy: true,
            ..TreeArgs::default()
        };

        assert!(args.merge(&defaults).unwrap().relation.is_none());
    }

    #[test]
    fn oversized_indent_is_rejected() {
        let args = TreeArgs {
            indent: Some(MAX_INDENT + 1),
            ..TreeArgs::default()
        };
        assert!(args.merge(&TreeConfig::default()).is_err());
    }
}
