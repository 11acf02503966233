//! Composite types and the catch-all fallback.

use std::collections::BTreeMap;

use typeschema_core::SchemaNode;

use crate::acceptor::{RootSlot, SchemaAcceptor};
use crate::catalog::{CompositeType, PropertyDef, TypeCatalog};
use crate::collection::VisitorCollection;
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::naming::NamingStrategy;
use crate::visibility::decorate;

pub(super) fn is_navigatable(ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool {
    matches!(ty, TypeDescriptor::Named(name) if catalog.composite(name).is_some())
}

pub(super) fn payload_visit(
    collection: &VisitorCollection,
    acceptor: &mut SchemaAcceptor,
    ty: &TypeDescriptor,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    if let TypeDescriptor::Named(name) = ty
        && let Some(composite) = collection.catalog().composite(name)
    {
        return visit_composite(collection, acceptor, composite, strategy);
    }

    log::warn!("no schema definition for `{ty}`, falling back to a plain object");
    Ok(SchemaNode::object())
}

/// Register `composite` as a root definition and return a reference to it.
///
/// The id is reserved before the properties are visited, so a property that
/// leads back to `composite` resolves to a reference instead of recursing.
fn visit_composite(
    collection: &VisitorCollection,
    acceptor: &mut SchemaAcceptor,
    composite: &CompositeType,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    let id = strategy.name(&composite.name);
    if acceptor.reserve_root(&id, &composite.name)? == RootSlot::Existing {
        return Ok(SchemaNode::reference(id));
    }

    let mut members = Members::new(collection, strategy, &composite.name);
    members.collect(acceptor, composite, true);

    let mut node = SchemaNode::object();
    node.description.clone_from(&composite.description);
    if !members.properties.is_empty() {
        node.properties = Some(members.properties);
    }
    if !members.required.is_empty() {
        node.required = Some(members.required);
    }
    node.additional_properties = members.additional_properties.map(Box::new);
    acceptor.complete_root(&id, node);

    Ok(SchemaNode::reference(id))
}

/// Properties of one definition, `#[serde(flatten)]` members inlined.
struct Members<'a> {
    collection: &'a VisitorCollection,
    strategy: &'a dyn NamingStrategy,
    properties: BTreeMap<String, SchemaNode>,
    required: Vec<String>,
    additional_properties: Option<SchemaNode>,
    /// Composites being inlined, outermost first.
    flattening: Vec<String>,
}

impl<'a> Members<'a> {
    fn new(collection: &'a VisitorCollection, strategy: &'a dyn NamingStrategy, root: &str) -> Self {
        Self {
            collection,
            strategy,
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: None,
            flattening: vec![root.to_string()],
        }
    }

    /// `required` is false inside an optional flattened member.
    fn collect(&mut self, acceptor: &mut SchemaAcceptor, composite: &CompositeType, required: bool) {
        for property in &composite.properties {
            if property.flatten {
                self.flatten(acceptor, &composite.name, property, required);
                continue;
            }

            let wire_name = property.wire_name(self.strategy);
            let mut schema = match self
                .collection
                .payload_visit(acceptor, &property.ty, self.strategy)
            {
                Ok(schema) => schema,
                Err(e) => {
                    log::warn!(
                        "skipping property `{}` of `{}`: {e}",
                        property.name,
                        composite.name
                    );
                    continue;
                }
            };
            if property.description.is_some() {
                schema.description.clone_from(&property.description);
            }
            decorate(&mut schema, property.visibility.as_ref(), self.strategy);

            if required && !property.ty.is_nullable_wrapper() {
                self.required.push(wire_name.clone());
            }
            self.properties.insert(wire_name, schema);
        }
    }

    fn flatten(
        &mut self,
        acceptor: &mut SchemaAcceptor,
        owner: &str,
        property: &PropertyDef,
        required: bool,
    ) {
        let (inner, optional) = match &property.ty {
            TypeDescriptor::Nullable(inner) => (inner.as_ref(), true),
            ty => (ty, false),
        };

        let collection = self.collection;
        if let TypeDescriptor::Named(name) = inner
            && let Some(nested) = collection.catalog().composite(name)
        {
            if self.flattening.contains(name) {
                log::warn!("`{owner}` flattens `{name}` into itself, skipping `{}`", property.name);
                return;
            }
            self.flattening.push(name.clone());
            self.collect(acceptor, nested, required && !optional);
            self.flattening.pop();
            return;
        }

        if let TypeDescriptor::Map { value, .. } = inner {
            match self.collection.payload_visit(acceptor, value, self.strategy) {
                Ok(schema) => self.additional_properties = Some(schema),
                Err(e) => log::warn!("skipping flattened `{}` of `{owner}`: {e}", property.name),
            }
            return;
        }

        log::warn!(
            "cannot flatten `{}` of `{owner}` ({inner}), skipping it",
            property.name
        );
    }
}
