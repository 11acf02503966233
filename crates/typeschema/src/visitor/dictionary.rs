use typeschema_core::SchemaNode;

use crate::acceptor::SchemaAcceptor;
use crate::collection::VisitorCollection;
use crate::descriptor::{PrimitiveType, TypeDescriptor};
use crate::error::Result;
use crate::naming::NamingStrategy;

/// Keys are serialized as JSON object keys, so only the value type shapes the schema.
pub(super) fn payload_visit(
    collection: &VisitorCollection,
    acceptor: &mut SchemaAcceptor,
    key: &TypeDescriptor,
    value: &TypeDescriptor,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    if !matches!(key, TypeDescriptor::Primitive(PrimitiveType::String)) {
        log::debug!("map key `{key}` is rendered as a string");
    }
    let value = collection.payload_visit(acceptor, value, strategy)?;
    Ok(SchemaNode::map(value))
}
