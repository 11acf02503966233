//! Assembly of a document's shared definitions table.
//!
//! Each payload gets its own [`SchemaAcceptor`], forked from the definitions
//! gathered so far. The builder is the only writer of the shared
//! [`Components`]; a failing parameter or payload is recorded and its siblings
//! are still derived.

use std::fmt;

use typeschema_core::{Components, SchemaNode};

use crate::acceptor::SchemaAcceptor;
use crate::collection::VisitorCollection;
use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SchemaError};
use crate::naming::NamingStrategy;
use crate::visibility::{VisibilityAttribute, decorate};

/// A parameter or payload whose schema could not be derived.
#[derive(Debug)]
pub struct Diagnostic {
    pub name: String,
    pub error: SchemaError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.name, self.error)
    }
}

pub struct DocumentBuilder<'a> {
    collection: &'a VisitorCollection,
    strategy: &'a dyn NamingStrategy,
    registry: SchemaAcceptor,
    components: Components,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DocumentBuilder<'a> {
    #[must_use]
    pub fn new(collection: &'a VisitorCollection, strategy: &'a dyn NamingStrategy) -> Self {
        Self {
            collection,
            strategy,
            registry: SchemaAcceptor::new(),
            components: Components::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Use the naming convention from the collection's options.
    #[must_use]
    pub fn from_options(collection: &'a VisitorCollection) -> Self {
        Self::new(collection, &collection.options().naming)
    }

    /// Continue an existing table. Its entries are referenced, not rebuilt.
    #[must_use]
    pub fn with_components(mut self, components: Components) -> Self {
        self.registry = SchemaAcceptor::with_root_schemas(components.schemas.clone());
        self.components = components;
        self
    }

    /// Derive a query, path or header parameter. Parameters never add definitions.
    pub fn add_parameter(
        &mut self,
        name: &str,
        ty: &TypeDescriptor,
        attribute: Option<&VisibilityAttribute>,
    ) -> Option<SchemaNode> {
        let result = if name.is_empty() {
            Err(SchemaError::EmptyName)
        } else {
            self.collection.parameter_visit(ty, self.strategy)
        };
        match result {
            Ok(mut node) => {
                decorate(&mut node, attribute, self.strategy);
                Some(node)
            }
            Err(error) => {
                self.record(name, error);
                None
            }
        }
    }

    /// Derive a request or response body and merge its definitions.
    pub fn add_payload(
        &mut self,
        name: &str,
        ty: &TypeDescriptor,
        attribute: Option<&VisibilityAttribute>,
    ) -> Option<SchemaNode> {
        match self.derive_payload(name, ty, attribute) {
            Ok(node) => Some(node),
            Err(error) => {
                self.record(name, error);
                None
            }
        }
    }

    fn derive_payload(
        &mut self,
        name: &str,
        ty: &TypeDescriptor,
        attribute: Option<&VisibilityAttribute>,
    ) -> Result<SchemaNode> {
        let mut acceptor = self.registry.fork();
        self.collection
            .visit(&mut acceptor, name, ty, self.strategy, attribute)?;

        let next = acceptor.fork();
        let (mut schemas, root_schemas) = acceptor.into_parts();
        let added = self.components.merge_schemas(root_schemas)?;
        self.registry = next;
        if added > 0 {
            log::debug!("`{name}` added {added} schema definition(s)");
        }

        schemas.remove(name).ok_or(SchemaError::EmptyName)
    }

    fn record(&mut self, name: &str, error: SchemaError) {
        let diagnostic = Diagnostic {
            name: name.to_string(),
            error,
        };
        log::warn!("schema derivation failed for {diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub const fn components(&self) -> &Components {
        &self.components
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn finish(self) -> (Components, Vec<Diagnostic>) {
        (self.components, self.diagnostics)
    }
}
