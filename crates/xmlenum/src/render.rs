//! Indented text rendering of a tag tree
//!
//! Each tag takes one line. Within a sibling group, leaf tags come first,
//! then branch tags, each group in ascending name order. A branch is
//! followed by its children indented one step deeper.

use std::fmt;

use crate::tree::{TagNode, TagTree};

/// Configuration options for rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Number of spaces added per nesting level
    pub indent_step: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { indent_step: 4 }
    }
}

impl RenderConfig {
    pub const fn new(indent_step: usize) -> Self {
        Self { indent_step }
    }
}

/// Render `tree` with the default four-space step.
pub fn render(tree: &TagTree) -> String {
    render_with_config(tree, &RenderConfig::default())
}

pub fn render_with_config(tree: &TagTree, config: &RenderConfig) -> String {
    Indented { tree, config }.to_string()
}

/// A tree paired with the configuration it is displayed with
struct Indented<'a> {
    tree: &'a TagTree,
    config: &'a RenderConfig,
}

impl fmt::Display for Indented<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self.tree, 0, self.config)
    }
}

/// Write `tree` to `out`, starting `indent` spaces in.
pub fn write_tree<W: fmt::Write>(
    out: &mut W,
    tree: &TagTree,
    indent: usize,
    config: &RenderConfig,
) -> fmt::Result {
    for (name, node) in tree.leaves().chain(tree.branches()) {
        writeln!(out, "{:indent$}{name}", "")?;
        if let TagNode::Branch(children) = node {
            write_tree(out, children, indent + config.indent_step, config)?;
        }
    }
    Ok(())
}

impl fmt::Display for TagTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self, 0, &RenderConfig::default())
    }
}
