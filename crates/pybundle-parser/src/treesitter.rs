//! Tree-sitter integration for Python AST parsing.

use anyhow::{Context, Result};
use std::path::Path;

/// Parse Python source and return the tree-sitter tree.
pub fn parse_python(path: &Path, source: &[u8]) -> Result<tree_sitter::Tree> {
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .context("failed to set tree-sitter language")?;
    parser
        .parse(source, None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse {}", path.display()))
}

/// Position (1-based line, 1-based column) of the first syntax error in a tree.
pub fn first_error_position(node: &tree_sitter::Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find_map(|child| first_error_position(&child))
}
