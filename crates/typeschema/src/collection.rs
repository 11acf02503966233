//! Dispatch over the registered visitors.

use std::collections::BTreeSet;

use typeschema_core::SchemaNode;

use crate::acceptor::SchemaAcceptor;
use crate::catalog::TypeCatalog;
use crate::config::SchemaOptions;
use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SchemaError};
use crate::naming::NamingStrategy;
use crate::visibility::VisibilityAttribute;
use crate::visitor::Visitor;

/// Ordered visitors plus the catalog they resolve named types against.
///
/// Dispatch picks the first visitor whose predicate accepts the type, so the
/// order of `visitors` decides which one wins when several could. The
/// collection is never mutated after construction and can be shared across
/// threads; all per-visit state lives in the [`SchemaAcceptor`].
#[derive(Debug, Clone)]
pub struct VisitorCollection {
    visitors: Vec<Visitor>,
    catalog: TypeCatalog,
    options: SchemaOptions,
}

impl VisitorCollection {
    /// Built-in visitors in priority order, default options.
    #[must_use]
    pub fn create_instance(catalog: TypeCatalog) -> Self {
        Self::with_options(catalog, SchemaOptions::default())
    }

    #[must_use]
    pub fn with_options(catalog: TypeCatalog, options: SchemaOptions) -> Self {
        Self::new(Visitor::BUILT_IN.to_vec(), catalog, options)
    }

    /// Custom ordering. Without `Visitor::Object` at the end, unmatched types
    /// fail with [`SchemaError::DispatchExhausted`].
    #[must_use]
    pub fn new(visitors: Vec<Visitor>, catalog: TypeCatalog, options: SchemaOptions) -> Self {
        Self {
            visitors,
            catalog,
            options,
        }
    }

    #[must_use]
    pub fn visitors(&self) -> &[Visitor] {
        &self.visitors
    }

    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// The visitor that would handle `ty` on the payload path.
    #[must_use]
    pub fn resolve(&self, ty: &TypeDescriptor) -> Option<Visitor> {
        self.visitors
            .iter()
            .copied()
            .find(|visitor| visitor.is_visitable(ty, &self.catalog))
    }

    /// Derive `ty` and store it at `acceptor.schemas[name]`.
    pub fn visit(
        &self,
        acceptor: &mut SchemaAcceptor,
        name: &str,
        ty: &TypeDescriptor,
        strategy: &dyn NamingStrategy,
        attribute: Option<&VisibilityAttribute>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let visitor = self
            .resolve(ty)
            .ok_or_else(|| SchemaError::DispatchExhausted {
                type_name: ty.declared_name(),
            })?;
        log::debug!("visiting `{name}`: {ty} with {visitor:?}");
        visitor.visit(self, acceptor, name, ty, strategy, attribute)
    }

    /// Schema of `ty` as a query, path or header parameter.
    pub fn parameter_visit(
        &self,
        ty: &TypeDescriptor,
        strategy: &dyn NamingStrategy,
    ) -> Result<SchemaNode> {
        let visitor = self
            .visitors
            .iter()
            .copied()
            .find(|visitor| visitor.is_parameter_visitable(ty, &self.catalog))
            .ok_or_else(|| SchemaError::UnsupportedParameterShape {
                type_name: ty.declared_name(),
            })?;
        visitor.parameter_visit(self, ty, strategy)
    }

    /// Schema of `ty` inside a body. Nesting beyond `options.max_depth`
    /// degrades to a plain object.
    pub fn payload_visit(
        &self,
        acceptor: &mut SchemaAcceptor,
        ty: &TypeDescriptor,
        strategy: &dyn NamingStrategy,
    ) -> Result<SchemaNode> {
        let visitor = self
            .visitors
            .iter()
            .copied()
            .find(|visitor| visitor.is_payload_visitable(ty, &self.catalog))
            .ok_or_else(|| SchemaError::DispatchExhausted {
                type_name: ty.declared_name(),
            })?;

        if acceptor.depth() >= self.options.max_depth {
            log::warn!(
                "`{ty}` is nested deeper than {} levels, falling back to a plain object",
                self.options.max_depth
            );
            return Ok(SchemaNode::object());
        }

        acceptor.enter();
        let result = visitor.payload_visit(self, acceptor, ty, strategy);
        acceptor.leave();
        result
    }

    /// Whether the members of `ty` lead to further named definitions.
    #[must_use]
    pub fn is_navigatable(&self, ty: &TypeDescriptor) -> bool {
        self.resolve(ty)
            .is_some_and(|visitor| visitor.is_navigatable(ty, &self.catalog))
    }

    /// Declared names of every catalog composite reachable from `ty`, `ty` included.
    ///
    /// Walks through wrappers and containers; each composite is expanded once.
    #[must_use]
    pub fn navigate(&self, ty: &TypeDescriptor) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut stack = vec![ty.clone()];
        while let Some(current) = stack.pop() {
            if self.is_navigatable(&current) {
                let TypeDescriptor::Named(name) = &current else {
                    continue;
                };
                if !found.insert(name.clone()) {
                    continue;
                }
                if let Some(composite) = self.catalog.composite(name) {
                    stack.extend(composite.properties.iter().map(|p| p.ty.clone()));
                }
            } else {
                stack.extend(current.generic_arguments().into_iter().cloned());
            }
        }
        found
    }
}
