//! Extract imported module names from Python source.
//!
//! Only the syntax tree is inspected; the script is never executed. Every
//! `import X` name and every absolute or package-relative `from X import Y`
//! module is collected, wherever the statement appears (function bodies,
//! `try` blocks and conditionals included).

use crate::treesitter;
use anyhow::Result;
use pybundle_core::diagnostic::{Diagnostic, Scanned};
use std::collections::BTreeSet;
use std::path::Path;

/// Read a file and extract the module names it imports.
///
/// Never fails: unreadable files and files with syntax errors yield an empty
/// set and a diagnostic naming the file.
pub fn extract_imports(path: &Path) -> Scanned<BTreeSet<String>> {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return unparsed(path, format!("could not read file: {e}")),
    };
    match imports_from_source(path, &source) {
        Ok(imports) => Scanned::clean(imports),
        Err(e) => unparsed(path, format!("{e:#}")),
    }
}

/// Extract imported module names from already-loaded source text.
///
/// Errors if the source does not parse as valid Python.
pub fn imports_from_source(path: &Path, source: &str) -> Result<BTreeSet<String>> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let tree = treesitter::parse_python(path, source.as_bytes())?;
    let root = tree.root_node();
    if let Some((line, column)) = treesitter::first_error_position(&root) {
        anyhow::bail!("invalid syntax at line {line}, column {column}");
    }

    let mut imports = BTreeSet::new();
    collect_imports(&root, source, &mut imports);
    Ok(imports)
}

fn unparsed(path: &Path, message: String) -> Scanned<BTreeSet<String>> {
    let diagnostic = Diagnostic::new(path, message);
    tracing::warn!("could not parse imports from {}", diagnostic);
    Scanned::with_diagnostic(BTreeSet::new(), diagnostic)
}

/// Recursively collect import names from the Python AST.
fn collect_imports(node: &tree_sitter::Node, source: &str, imports: &mut BTreeSet<String>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_statement" => {
                let mut names = child.walk();
                for name in child.children_by_field_name("name", &mut names) {
                    // import a.b as c -> a.b
                    let dotted = if name.kind() == "aliased_import" {
                        name.child_by_field_name("name")
                    } else {
                        Some(name)
                    };
                    if let Some(dotted) = dotted {
                        insert_dotted(&dotted, source, imports);
                    }
                }
            }
            "import_from_statement" => {
                if let Some(module) = child.child_by_field_name("module_name") {
                    match module.kind() {
                        "dotted_name" => insert_dotted(&module, source, imports),
                        // from .pkg import x -> pkg; from . import x has no module
                        "relative_import" => {
                            let mut inner = module.walk();
                            let dotted = module
                                .named_children(&mut inner)
                                .find(|n| n.kind() == "dotted_name");
                            if let Some(dotted) = dotted {
                                insert_dotted(&dotted, source, imports);
                            }
                        }
                        _ => {}
                    }
                }
            }
            "future_import_statement" => {
                imports.insert("__future__".to_string());
            }
            _ => collect_imports(&child, source, imports),
        }
    }
}

fn insert_dotted(node: &tree_sitter::Node, source: &str, imports: &mut BTreeSet<String>) {
    let name: String = source[node.byte_range()]
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\\')
        .collect();
    if !name.is_empty() {
        imports.insert(name);
    }
}
