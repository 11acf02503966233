//! Schema data model for the typeschema derivation engine.
//!
//! These types are the output side of derivation: [`SchemaNode`] fragments and
//! the document-wide [`Components`] table they point into.

pub mod components;
pub mod schema;

pub use components::{Components, DefinitionConflict};
pub use schema::{Reference, ReferenceType, SCHEMA_REF_PREFIX, SchemaNode, SchemaType};
