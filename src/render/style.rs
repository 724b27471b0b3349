//! Terminal styling for header tokens
//!
//! Styling is applied with `crossterm` escape sequences. Every measurement in
//! the renderer goes through [`super::text::visible_width`], so the markup
//! never shifts wrap columns or prefixes.

use crossterm::style::{Color, Stylize};

use crate::domain::{Annotation, TaskStatus};

/// Palette cycled through for colored tags
const TAG_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::DarkCyan,
];

/// Wraps tokens in style markup when enabled, passes them through otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn name(&self, text: &str, status: Option<&TaskStatus>) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match status {
            Some(s) if s.is_complete() => text.dim().to_string(),
            Some(s) if s.is_active() => text.bold().to_string(),
            _ => text.to_string(),
        }
    }

    pub fn status(&self, status: &TaskStatus) -> String {
        let label = status.label();
        if !self.enabled {
            return label.to_string();
        }
        match status {
            TaskStatus::Todo => label.white().to_string(),
            TaskStatus::InProgress => label.yellow().to_string(),
            TaskStatus::Blocked => label.red().to_string(),
            TaskStatus::Done => label.green().to_string(),
            TaskStatus::Cancelled => label.dark_grey().to_string(),
            TaskStatus::Other(_) => label.to_string(),
        }
    }

    pub fn priority(&self, priority: i64) -> String {
        let text = format!("P{}", priority);
        if !self.enabled {
            return text;
        }
        match priority {
            i64::MIN..=1 => text.red().bold().to_string(),
            2 => text.yellow().to_string(),
            _ => text.blue().to_string(),
        }
    }

    /// `#tag`, colored by a stable hash of the tag when `colored` is set
    pub fn tag(&self, tag: &str, colored: bool) -> String {
        let text = format!("#{}", tag);
        if !self.enabled || !colored {
            return text;
        }
        let hash = tag.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        text.with(TAG_COLORS[hash % TAG_COLORS.len()]).to_string()
    }

    pub fn id(&self, text: &str) -> String {
        self.dim(text)
    }

    pub fn annotation(&self, annotation: Annotation) -> String {
        let text = annotation.to_string();
        if !self.enabled {
            return text;
        }
        match annotation {
            Annotation::Orphan => text.yellow().to_string(),
            Annotation::CyclicHierarchy | Annotation::CycleReference => text.magenta().to_string(),
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::visible_width;

    #[test]
    fn disabled_painter_is_plain() {
        let p = Painter::new(false);
        assert_eq!(p.status(&TaskStatus::Done), "done");
        assert_eq!(p.priority(1), "P1");
        assert_eq!(p.tag("api", true), "#api");
        assert_eq!(p.annotation(Annotation::Orphan), "[orphan]");
    }

    #[test]
    fn enabled_painter_keeps_visible_width() {
        let p = Painter::new(true);
        assert_eq!(visible_width(&p.status(&TaskStatus::InProgress)), "in_progress".len());
        assert_eq!(visible_width(&p.priority(1)), 2);
        assert_eq!(visible_width(&p.tag("backend", true)), "#backend".len());
        assert_eq!(visible_width(&p.dim("[T1]")), 4);
    }

    #[test]
    fn plain_tags_ignore_color() {
        let p = Painter::new(true);
        assert_eq!(p.tag("api", false), "#api");
    }
}
