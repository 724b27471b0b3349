//! Output assembler
//!
//! Walks a forest pre-order with an explicit stack, so depth is bounded by
//! memory rather than the call stack. Each frame carries the node and its
//! depth; a shared `lasts` vector holds the is-last flags of the current
//! ancestry and is cut back to the frame's depth when the frame is popped.

use crate::domain::Forest;

use super::config::RenderConfig;
use super::connector::{prefixes, Glyphs, BAR, BRANCH_MID};
use super::content::content_block;
use super::style::Painter;
use super::text::visible_width;
use super::RenderError;

/// One output line, split into its connector prefix and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub prefix: String,
    pub content: String,
    /// Depth of the node that produced the line
    pub depth: usize,
}

impl RenderedLine {
    /// The full display line
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.content)
    }
}

struct Frame {
    idx: usize,
    depth: usize,
    is_last: bool,
}

/// Produces the prefixed lines of every placed node, in pre-order
pub fn assemble(forest: &Forest<'_>, config: &RenderConfig) -> Vec<RenderedLine> {
    let glyphs = Glyphs::for_indent(&config.indent_unit);
    let painter = Painter::new(config.colorize);

    let mut out = Vec::with_capacity(forest.len());
    let mut lasts: Vec<bool> = Vec::new();
    let mut stack = frames(forest.roots(), 0);

    while let Some(frame) = stack.pop() {
        let node = forest.node(frame.idx);
        lasts.truncate(frame.depth);

        let prefix = prefixes(&lasts, frame.is_last, &glyphs);
        let block = content_block(node.task, node.annotation, config, &painter);

        for (i, content) in block.into_iter().enumerate() {
            let prefix = if i == 0 {
                prefix.header.clone()
            } else {
                prefix.continuation.clone()
            };
            out.push(RenderedLine {
                prefix,
                content,
                depth: frame.depth,
            });
        }

        lasts.push(frame.is_last);
        stack.extend(frames(&node.children, frame.depth + 1));
    }

    out
}

/// Frames for a sibling group, reversed so the first sibling pops first
fn frames(siblings: &[usize], depth: usize) -> Vec<Frame> {
    let count = siblings.len();
    siblings
        .iter()
        .enumerate()
        .rev()
        .map(|(i, &idx)| Frame {
            idx,
            depth,
            is_last: i + 1 == count,
        })
        .collect()
}

/// Checks the connector layout of assembled lines
///
/// Every prefix must be exactly `(depth + 1)` units wide, and every `│` in a
/// prefix must continue a `│` or `├` at the same column of the line above.
pub fn validate(lines: &[RenderedLine], config: &RenderConfig) -> Result<(), RenderError> {
    let unit = Glyphs::for_indent(&config.indent_unit).width();
    let mut above: Vec<char> = Vec::new();

    for (line_no, line) in lines.iter().enumerate() {
        let expected = (line.depth + 1) * unit;
        let found = visible_width(&line.prefix);
        if found != expected {
            return Err(RenderError::MisalignedPrefix {
                line: line_no + 1,
                expected,
                found,
            });
        }

        // Glyphs are all single-column, so char index equals column
        let columns: Vec<char> = line.prefix.chars().collect();
        for (column, &c) in columns.iter().enumerate() {
            if c != BAR {
                continue;
            }
            let supported = matches!(above.get(column), Some(&a) if a == BAR || a == BRANCH_MID);
            if !supported {
                return Err(RenderError::MisalignedPipe {
                    line: line_no + 1,
                    column: column + 1,
                });
            }
        }
        above = columns;
    }

    Ok(())
}
