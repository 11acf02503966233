use typeschema_core::SchemaNode;

use crate::catalog::TypeCatalog;
use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SchemaError};
use crate::naming::NamingStrategy;

pub(super) fn is_enum(ty: &TypeDescriptor, catalog: &TypeCatalog) -> bool {
    matches!(ty, TypeDescriptor::Named(name) if catalog.enum_type(name).is_some())
}

/// Inline string schema listing the variant names.
pub(super) fn visit(
    catalog: &TypeCatalog,
    name: &str,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    let enum_type = catalog
        .enum_type(name)
        .ok_or_else(|| SchemaError::unsupported(name, "not an enum in the type catalog"))?;

    let mut node = SchemaNode::string();
    node.enum_values = Some(
        enum_type
            .variants
            .iter()
            .map(|variant| serde_json::Value::String(variant.wire_name(strategy)))
            .collect(),
    );
    node.description.clone_from(&enum_type.description);
    Ok(node)
}
