use typeschema_core::SchemaNode;

use crate::acceptor::SchemaAcceptor;
use crate::collection::VisitorCollection;
use crate::descriptor::{ListFamily, TypeDescriptor};
use crate::error::Result;
use crate::naming::NamingStrategy;

pub(super) const fn is_list(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::List { .. })
}

fn array(family: ListFamily, items: SchemaNode) -> SchemaNode {
    let mut node = SchemaNode::array(items);
    if family == ListFamily::Set {
        node.unique_items = Some(true);
    }
    node
}

pub(super) fn payload_visit(
    collection: &VisitorCollection,
    acceptor: &mut SchemaAcceptor,
    family: ListFamily,
    item: &TypeDescriptor,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    let items = collection.payload_visit(acceptor, item, strategy)?;
    Ok(array(family, items))
}

/// Repeated query values; the items must be simple parameters themselves.
pub(super) fn parameter_visit(
    collection: &VisitorCollection,
    family: ListFamily,
    item: &TypeDescriptor,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    let items = collection.parameter_visit(item, strategy)?;
    Ok(array(family, items))
}
