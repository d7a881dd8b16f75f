//! Domain models for documentation linting.
//!
//! This module contains the entity kinds and their naming conventions, the
//! loaded entities and their typed views, the document index, the
//! validators, and the traceability matrix built from a validated index.

mod config;
pub use config::Config;

/// Typed views over loaded documents.
pub mod entity;
pub use entity::Entity;

mod index;
pub use index::{DocumentIndex, DuplicateId};

mod kind;
pub use kind::Kind;

/// Traceability matrix projection.
pub mod matrix;
pub use matrix::TraceMatrix;

mod validation;
pub use validation::{Diagnostics, ValidationSink, Validator, validate_id};
