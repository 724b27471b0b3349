//! Content block formatter
//!
//! Turns one task into the display lines that follow its prefix: a header
//! line, then the description, then recent comments. Lines come out unprefixed;
//! the assembler adds connectors.

use crate::domain::{Annotation, Comment, Task};

use super::config::{RenderConfig, TagStyle};
use super::style::Painter;
use super::text::{expand_tabs, single_line, truncate_chars, wrap_words};

/// Indent of comment text below its `>` header
const COMMENT_INDENT: &str = "  ";

/// Builds the display lines for one placed task (never empty)
pub fn content_block(
    task: &Task,
    annotation: Option<Annotation>,
    config: &RenderConfig,
    painter: &Painter,
) -> Vec<String> {
    let mut lines = vec![header(task, annotation, config, painter)];

    if config.show_descriptions {
        if let Some(description) = &task.description {
            lines.extend(description_lines(description, config));
        }
    }

    if config.show_comments > 0 {
        lines.extend(comment_lines(&task.comments, config.show_comments, painter));
    }

    lines
}

/// Name followed by the optional header tokens, space separated
fn header(
    task: &Task,
    annotation: Option<Annotation>,
    config: &RenderConfig,
    painter: &Painter,
) -> String {
    let mut parts = vec![painter.name(&single_line(&task.name), task.status.as_ref())];

    if config.show_ids {
        parts.push(painter.id(&format!("[{}]", task.id)));
    }

    if config.show_type_emoji {
        if let Some(kind) = &task.kind {
            parts.push(kind.emoji().to_string());
        }
    }

    if config.show_status {
        let mut badge = Vec::new();
        if let Some(status) = &task.status {
            badge.push(painter.status(status));
        }
        if let Some(priority) = task.priority {
            badge.push(painter.priority(priority));
        }
        if !badge.is_empty() {
            parts.push(format!("({})", badge.join(", ")));
        }
    }

    if config.show_tags && !task.tags.is_empty() {
        let colored = config.tag_style == TagStyle::Colored;
        let tags: Vec<String> = task
            .tags
            .iter()
            .map(|tag| painter.tag(&single_line(tag), colored))
            .collect();
        parts.push(tags.join(" "));
    }

    if config.show_score {
        if let Some(score) = task.score {
            parts.push(format!("score={}", score));
        }
    }

    if config.show_dates {
        if let Some(created) = task.created_at {
            parts.push(painter.dim(&format!("@{}", created.format("%Y-%m-%d"))));
        }
    }

    if let Some(annotation) = annotation {
        parts.push(painter.annotation(annotation));
    }

    parts.join(" ")
}

/// Wrapped description lines with paragraph breaks kept as empty lines
fn description_lines(raw: &str, config: &RenderConfig) -> Vec<String> {
    let text = truncate_chars(&expand_tabs(raw), config.max_description_length);

    let mut lines = Vec::new();
    let mut pending_blank = false;

    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.extend(wrap_words(&single_line(line), config.description_length));
    }

    lines
}

/// The most recent `limit` comments, oldest first
fn comment_lines(comments: &[Comment], limit: usize, painter: &Painter) -> Vec<String> {
    let mut ordered: Vec<&Comment> = comments.iter().collect();
    ordered.sort_by_key(|c| c.timestamp);
    let start = ordered.len().saturating_sub(limit);

    let mut lines = Vec::new();
    for comment in &ordered[start..] {
        let author = match comment.author.trim() {
            "" => "anonymous",
            name => name,
        };
        lines.push(painter.dim(&format!(
            "> {}, {}",
            single_line(author),
            comment.timestamp.format("%Y-%m-%d %H:%M")
        )));

        for line in expand_tabs(&comment.text).split('\n') {
            lines.push(format!("{}{}", COMMENT_INDENT, single_line(line)));
        }
    }
    lines
}
