//! Core types and configuration for pybundle.
//!
//! Provides the dependency-analysis data model ([`model::DependencyAnalysis`]),
//! the fail-soft result wrapper ([`diagnostic::Scanned`]) and the layered
//! configuration ([`config::BundleConfig`]).

pub mod config;
pub mod diagnostic;
pub mod model;
