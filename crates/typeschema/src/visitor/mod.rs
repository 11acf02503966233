//! The built-in visitors.
//!
//! Each visitor answers four questions about a type (is it navigatable,
//! visitable, usable as a simple parameter, usable as a payload) and knows how
//! to turn the types it accepts into a [`SchemaNode`]. Nested types are handed
//! back to the [`VisitorCollection`], which is passed in rather than stored so
//! visitors stay plain values.
//!
//! # Module Structure
//!
//! - `nullable` - `Option<T>`
//! - `dictionary` - string-keyed maps
//! - `list` - sequences and sets
//! - `primitive` - scalars and free-form JSON
//! - `enumeration` - fieldless enums from the catalog
//! - `object` - composites from the catalog, and the catch-all fallback

mod dictionary;
mod enumeration;
mod list;
mod nullable;
mod object;
mod primitive;

use typeschema_core::SchemaNode;

use crate::acceptor::SchemaAcceptor;
use crate::catalog::TypeCatalog;
use crate::collection::VisitorCollection;
use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SchemaError};
use crate::naming::NamingStrategy;
use crate::visibility::{VisibilityAttribute, decorate};

/// A schema visitor. Variant order in [`Visitor::BUILT_IN`] is dispatch priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visitor {
    Nullable,
    Dictionary,
    List,
    Dynamic,
    Primitive,
    Enum,
    Object,
}

impl Visitor {
    /// Built-in visitors, most specific first; `Object` accepts anything.
    pub const BUILT_IN: [Self; 7] = [
        Self::Nullable,
        Self::Dictionary,
        Self::List,
        Self::Dynamic,
        Self::Primitive,
        Self::Enum,
        Self::Object,
    ];

    /// Whether the members of `ty` should be explored for further named types.
    #[must_use]
    pub fn is_navigatable(self, ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool {
        match self {
            Self::Object => object::is_navigatable(ty, catalog),
            Self::Nullable
            | Self::Dictionary
            | Self::List
            | Self::Dynamic
            | Self::Primitive
            | Self::Enum => false,
        }
    }

    #[must_use]
    pub fn is_visitable(self, ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool {
        match self {
            Self::Nullable => ty.is_nullable_wrapper(),
            Self::Dictionary => ty.is_enumerable_of_pairs(),
            Self::List => list::is_list(ty),
            Self::Dynamic => matches!(ty, TypeDescriptor::Dynamic),
            Self::Primitive => matches!(ty, TypeDescriptor::Primitive(_)),
            Self::Enum => enumeration::is_enum(ty, catalog),
            Self::Object => true,
        }
    }

    #[must_use]
    pub fn is_parameter_visitable(self, ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool {
        match self {
            Self::Nullable => ty.is_nullable_wrapper(),
            Self::List => list::is_list(ty),
            Self::Primitive => matches!(ty, TypeDescriptor::Primitive(_)),
            Self::Enum => enumeration::is_enum(ty, catalog),
            Self::Dictionary | Self::Dynamic | Self::Object => false,
        }
    }

    #[must_use]
    pub fn is_payload_visitable(self, ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool {
        self.is_visitable(ty, catalog)
    }

    /// Derive the schema for `ty`, decorate it and store it at `acceptor.schemas[name]`.
    pub fn visit(
        self,
        collection: &VisitorCollection,
        acceptor: &mut SchemaAcceptor,
        name: &str,
        ty: &TypeDescriptor,
        strategy: &dyn NamingStrategy,
        attribute: Option<&VisibilityAttribute>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let mut node = self.payload_visit(collection, acceptor, ty, strategy)?;
        decorate(&mut node, attribute, strategy);
        acceptor.accept(name, node)
    }

    /// Schema of `ty` as a query, path or header parameter.
    pub fn parameter_visit(
        self,
        collection: &VisitorCollection,
        ty: &TypeDescriptor,
        strategy: &dyn NamingStrategy,
    ) -> Result<SchemaNode> {
        match (self, ty) {
            (Self::Nullable, TypeDescriptor::Nullable(inner)) => {
                nullable::parameter_visit(collection, inner, strategy)
            }
            (Self::Dictionary | Self::Dynamic | Self::Object, _) => {
                Err(SchemaError::UnsupportedParameterShape {
                    type_name: ty.declared_name(),
                })
            }
            (Self::List, TypeDescriptor::List { family, item }) => {
                list::parameter_visit(collection, *family, item, strategy)
            }
            (Self::Primitive, TypeDescriptor::Primitive(primitive)) => Ok(primitive.schema()),
            (Self::Enum, TypeDescriptor::Named(name)) => {
                enumeration::visit(collection.catalog(), name, strategy)
            }
            _ => Err(self.mismatch(ty)),
        }
    }

    /// Schema of `ty` inside a request or response body.
    ///
    /// Named definitions reached on the way are registered in
    /// `acceptor.root_schemas`; `acceptor.schemas` is left untouched.
    pub fn payload_visit(
        self,
        collection: &VisitorCollection,
        acceptor: &mut SchemaAcceptor,
        ty: &TypeDescriptor,
        strategy: &dyn NamingStrategy,
    ) -> Result<SchemaNode> {
        match (self, ty) {
            (Self::Nullable, TypeDescriptor::Nullable(inner)) => {
                nullable::payload_visit(collection, acceptor, inner, strategy)
            }
            (Self::Dictionary, TypeDescriptor::Map { key, value, .. }) => {
                dictionary::payload_visit(collection, acceptor, key, value, strategy)
            }
            (Self::List, TypeDescriptor::List { family, item }) => {
                list::payload_visit(collection, acceptor, *family, item, strategy)
            }
            (Self::Dynamic, TypeDescriptor::Dynamic) => Ok(primitive::dynamic()),
            (Self::Primitive, TypeDescriptor::Primitive(primitive)) => Ok(primitive.schema()),
            (Self::Enum, TypeDescriptor::Named(name)) => {
                enumeration::visit(collection.catalog(), name, strategy)
            }
            (Self::Object, _) => object::payload_visit(collection, acceptor, ty, strategy),
            _ => Err(self.mismatch(ty)),
        }
    }

    fn mismatch(self, ty: &TypeDescriptor) -> SchemaError {
        SchemaError::unsupported(
            ty.declared_name(),
            format!("not handled by the {self:?} visitor"),
        )
    }
}
