//! Configuration handling for tasktree
//!
//! Configuration is stored in `.tasktree/config.toml` (project) and
//! `~/.config/tasktree/config.toml` (global). The project `[tree]` table holds
//! defaults for the `tree` command; command-line flags override it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{
    RenderConfig, TagStyle, DEFAULT_DESCRIPTION_LENGTH, DEFAULT_MAX_DESCRIPTION_LENGTH,
};

use super::PROJECT_DIR;

/// Widest indent accepted for tree prefixes
pub const MAX_INDENT: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// When to emit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolves the choice against the current environment
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_tty()
            }
        }
    }
}

/// Defaults for the `tree` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub ids: bool,
    pub score: bool,
    pub tags: bool,
    pub tag_style: TagStyle,
    pub emoji: bool,
    pub descriptions: bool,
    pub description_length: usize,
    pub max_description_length: usize,
    pub comments: usize,
    pub dates: bool,
    pub status: bool,
    /// Spaces after each connector column
    pub indent: usize,
    /// Relation followed by default (relation view instead of hierarchy)
    pub relation: Option<String>,
    pub validate_pipes: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            ids: false,
            score: false,
            tags: false,
            tag_style: TagStyle::Plain,
            emoji: false,
            descriptions: false,
            description_length: DEFAULT_DESCRIPTION_LENGTH,
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
            comments: 0,
            dates: false,
            status: false,
            indent: 2,
            relation: None,
            validate_pipes: false,
        }
    }
}

impl TreeConfig {
    /// Rejects values the renderer cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent > MAX_INDENT {
            return Err(ConfigError::Invalid(format!(
                "tree.indent must be at most {}, got {}",
                MAX_INDENT, self.indent
            )));
        }
        if self.relation.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Invalid(
                "tree.relation must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the render configuration these defaults describe
    pub fn to_render_config(&self, colorize: bool) -> RenderConfig {
        RenderConfig {
            colorize,
            show_ids: self.ids,
            show_score: self.score,
            show_tags: self.tags,
            tag_style: self.tag_style,
            show_type_emoji: self.emoji,
            show_status: self.status,
            show_descriptions: self.descriptions,
            description_length: self.description_length,
            max_description_length: self.max_description_length,
            show_comments: self.comments,
            show_dates: self.dates,
            indent_unit: " ".repeat(self.indent),
            dependency_as_tree: self.relation.is_some(),
            dependency_type: self.relation.clone(),
            validate_pipes: self.validate_pipes,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    /// Overrides the global color setting
    pub color: Option<ColorChoice>,

    /// Tree rendering defaults
    pub tree: TreeConfig,
}

/// Global user configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    pub color: ColorChoice,

    /// Author recorded on new comments (defaults to $USER)
    pub author: Option<String>,
}

impl GlobalConfig {
    /// Gets the effective comment author from config, environment, or defaults
    pub fn effective_author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tasktree", "tasktree").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// The color setting in effect (project overrides global)
    pub fn color(&self) -> ColorChoice {
        self.project.color.unwrap_or(self.global.color)
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .tree
            .validate()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;
        Ok(config)
    }

    /// Finds the project root by looking for a `.tasktree/` directory at or
    /// above `start`
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Finds the project root starting at the current directory
    pub fn find_project_root() -> Option<PathBuf> {
        Self::find_project_root_from(&std::env::current_dir().ok()?)
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self
            .project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a tasktree project. Run 'tasktree init' first."))?;
        let config_path = root.join(PROJECT_DIR).join("config.toml");

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}
