//! Tree-sitter based analysis of Python scripts for packaging.
//!
//! Extracts imported module names, finds sibling modules, reads requirements
//! manifests and combines them into a [`pybundle_core::model::DependencyAnalysis`].

pub mod analysis;
pub mod discovery;
pub mod imports;
pub mod requirements;
pub mod treesitter;
