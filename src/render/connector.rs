//! Connector and prefix engine
//!
//! Every node owns one prefix unit per ancestor level plus one for itself.
//! A unit is a connector column followed by the indent padding, so all four
//! glyphs share one display width:
//!
//! ```text
//! ├─ mid sibling
//! └─ last sibling
//! │  ancestor (or this node) still has siblings below
//!    nothing below
//! ```

use super::text::visible_width;

pub const BRANCH_MID: char = '├';
pub const BRANCH_LAST: char = '└';
pub const BAR: char = '│';
const HORIZONTAL: char = '─';

/// The four glyphs for one indent unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub mid: String,
    pub last: String,
    pub bar: String,
    pub blank: String,
}

impl Glyphs {
    /// Builds glyphs whose width is one column plus the width of `indent_unit`
    pub fn for_indent(indent_unit: &str) -> Self {
        let pad = visible_width(indent_unit);
        let branch = |corner: char| {
            let mut s = String::with_capacity(pad * 3 + 3);
            s.push(corner);
            s.extend(std::iter::repeat(HORIZONTAL).take(pad.saturating_sub(1)));
            if pad > 0 {
                s.push(' ');
            }
            s
        };

        Self {
            mid: branch(BRANCH_MID),
            last: branch(BRANCH_LAST),
            bar: format!("{}{}", BAR, " ".repeat(pad)),
            blank: " ".repeat(pad + 1),
        }
    }

    /// Display width of one unit
    pub fn width(&self) -> usize {
        visible_width(&self.blank)
    }
}

/// Header and continuation prefixes for one node
///
/// The continuation prefix keeps the header's ancestor units unchanged. Its
/// last unit is not always blank padding in place of the branch glyph: under a
/// mid sibling it is a bar, so the vertical line runs down through the node's
/// extra lines to the next sibling. Both prefixes are `depth + 1` units wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes {
    /// Ancestor units followed by the branch glyph
    pub header: String,
    /// Ancestor units followed by a bar (more siblings below) or blank
    pub continuation: String,
}

/// Computes the prefixes of a node
///
/// `ancestors_last[i]` says whether the ancestor at depth `i` was the last of
/// its siblings. Its length is the node's depth.
pub fn prefixes(ancestors_last: &[bool], is_last: bool, glyphs: &Glyphs) -> Prefixes {
    let mut ancestry = String::with_capacity((ancestors_last.len() + 1) * glyphs.blank.len());
    for &last in ancestors_last {
        ancestry.push_str(if last { &glyphs.blank } else { &glyphs.bar });
    }

    let (branch, below) = if is_last {
        (&glyphs.last, &glyphs.blank)
    } else {
        (&glyphs.mid, &glyphs.bar)
    };

    Prefixes {
        header: format!("{}{}", ancestry, branch),
        continuation: format!("{}{}", ancestry, below),
    }
}
