//! Derives OpenAPI schema fragments from Rust type descriptions.
//!
//! A [`VisitorCollection`] holds an ordered list of [`Visitor`]s and a
//! [`TypeCatalog`] of user-defined types. Given a [`TypeDescriptor`], the first
//! visitor that accepts it produces a [`SchemaNode`]; named composites are
//! registered once in a shared definitions table and referenced everywhere
//! else. Results land in a [`SchemaAcceptor`], one per top-level visit, and
//! [`DocumentBuilder`] merges those into a document's [`Components`].
//!
//! ```
//! use typeschema::{NamingConvention, SchemaAcceptor, TypeCatalog, TypeDescriptor, VisitorCollection};
//!
//! let catalog = TypeCatalog::from_source("pub struct FakeModel { pub number: i32 }").unwrap();
//! let collection = VisitorCollection::create_instance(catalog);
//! let mut acceptor = SchemaAcceptor::new();
//! let ty = TypeDescriptor::parse("HashMap<String, FakeModel>").unwrap();
//!
//! collection
//!     .visit(&mut acceptor, "hello", &ty, &NamingConvention::CamelCase, None)
//!     .unwrap();
//!
//! let value = acceptor.schemas["hello"].additional_properties.as_deref().unwrap();
//! assert_eq!(value.reference_id(), Some("fakeModel"));
//! assert!(acceptor.has_root("fakeModel"));
//! ```

pub mod acceptor;
mod attrs;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod naming;
pub mod visibility;
pub mod visitor;

pub use acceptor::{RootSlot, SchemaAcceptor};
pub use catalog::{CompositeType, EnumType, EnumVariant, PropertyDef, TypeCatalog, TypeDefinition};
pub use collection::VisitorCollection;
pub use config::SchemaOptions;
pub use descriptor::{ListFamily, MapFamily, PrimitiveType, TypeDescriptor};
pub use document::{Diagnostic, DocumentBuilder};
pub use error::{Result, SchemaError};
pub use naming::{NamingConvention, NamingStrategy};
pub use typeschema_core::{Components, Reference, SchemaNode, SchemaType};
pub use visibility::{VISIBILITY_EXTENSION, VisibilityAttribute, VisibilityType};
pub use visitor::Visitor;
