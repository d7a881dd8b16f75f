//! Docs-as-code referential integrity
//!
//! Product documents (screens, components, requirements, rules, flows
//! and messages) are YAML files in a fixed directory layout. This crate
//! reads them with a small purpose-built parser, indexes them by identifier,
//! and reports malformed identifiers and references to documents that do not
//! exist.

pub mod domain;
pub use domain::{
    Config, Diagnostics, DocumentIndex, Entity, Kind, TraceMatrix, ValidationSink, Validator,
};

/// Filesystem storage and document parsing.
pub mod storage;
pub use storage::{Directory, LoadError};
