use typeschema_core::SchemaNode;

use crate::acceptor::SchemaAcceptor;
use crate::collection::VisitorCollection;
use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::naming::NamingStrategy;

pub(super) fn payload_visit(
    collection: &VisitorCollection,
    acceptor: &mut SchemaAcceptor,
    inner: &TypeDescriptor,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    let mut node = collection.payload_visit(acceptor, inner, strategy)?;
    node.nullable = true;
    Ok(node)
}

pub(super) fn parameter_visit(
    collection: &VisitorCollection,
    inner: &TypeDescriptor,
    strategy: &dyn NamingStrategy,
) -> Result<SchemaNode> {
    let mut node = collection.parameter_visit(inner, strategy)?;
    node.nullable = true;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::super::Visitor;
    use super::super::fixtures::{STRATEGY, collection};
    use crate::acceptor::SchemaAcceptor;
    use crate::catalog::TypeCatalog;
    use crate::descriptor::TypeDescriptor;
    use crate::visibility::{VISIBILITY_EXTENSION, VisibilityType};
    use rstest::rstest;
    use typeschema_core::{SchemaNode, SchemaType};

    #[rstest]
    #[case("Option<DateTime>", true)]
    #[case("Option<i32>", true)]
    #[case("DateTime", false)]
    #[case("Vec<Option<i32>>", false)]
    fn is_visitable(#[case] source: &str, #[case] expected: bool) {
        let ty = TypeDescriptor::parse(source).unwrap();
        let catalog = TypeCatalog::new();
        assert_eq!(Visitor::Nullable.is_visitable(&ty, &catalog), expected);
        assert_eq!(Visitor::Nullable.is_parameter_visitable(&ty, &catalog), expected);
        assert_eq!(Visitor::Nullable.is_payload_visitable(&ty, &catalog), expected);
    }

    #[test]
    fn is_never_navigatable() {
        let ty = TypeDescriptor::parse("Option<FakeModel>").unwrap();
        assert!(!Visitor::Nullable.is_navigatable(&ty, collection().catalog()));
    }

    #[rstest]
    #[case("Option<DateTime>", SchemaType::String, Some("date-time"))]
    #[case("Option<i32>", SchemaType::Integer, Some("int32"))]
    #[case("Option<bool>", SchemaType::Boolean, None)]
    fn visit(
        #[case] source: &str,
        #[case] schema_type: SchemaType,
        #[case] format: Option<&str>,
    ) {
        let collection = collection();
        let mut acceptor = SchemaAcceptor::new();
        let ty = TypeDescriptor::parse(source).unwrap();

        Visitor::Nullable
            .visit(&collection, &mut acceptor, "hello", &ty, &STRATEGY, None)
            .unwrap();

        let node = &acceptor.schemas["hello"];
        assert_eq!(node.schema_type, Some(schema_type));
        assert_eq!(node.format.as_deref(), format);
        assert!(node.nullable);
        assert!(acceptor.root_schemas.is_empty());
    }

    #[rstest]
    #[case(VisibilityType::Important)]
    #[case(VisibilityType::Advanced)]
    #[case(VisibilityType::Internal)]
    fn visit_with_visibility(#[case] visibility: VisibilityType) {
        let collection = collection();
        let mut acceptor = SchemaAcceptor::new();
        let ty = TypeDescriptor::parse("Option<DateTime>").unwrap();
        let attribute = visibility.into();

        Visitor::Nullable
            .visit(&collection, &mut acceptor, "hello", &ty, &STRATEGY, Some(&attribute))
            .unwrap();

        let node = &acceptor.schemas["hello"];
        assert_eq!(
            node.extension(VISIBILITY_EXTENSION),
            Some(&serde_json::json!(visibility.display_name(&STRATEGY)))
        );
    }

    #[rstest]
    #[case("Option<DateTime>", SchemaNode::string().with_format("date-time"))]
    #[case("Option<i32>", SchemaNode::integer().with_format("int32"))]
    fn parameter_visit(#[case] source: &str, #[case] inner: SchemaNode) {
        let collection = collection();
        let ty = TypeDescriptor::parse(source).unwrap();

        let node = Visitor::Nullable
            .parameter_visit(&collection, &ty, &STRATEGY)
            .unwrap();

        assert_eq!(node, SchemaNode { nullable: true, ..inner });
    }

    #[test]
    fn parameter_visit_propagates_unsupported_inner_shape() {
        let collection = collection();
        let ty = TypeDescriptor::parse("Option<HashMap<String, i32>>").unwrap();

        let err = Visitor::Nullable
            .parameter_visit(&collection, &ty, &STRATEGY)
            .unwrap_err();
        assert!(err.is_unsupported_shape());
    }

    #[test]
    fn payload_visit_of_composite_is_nullable_reference() {
        let collection = collection();
        let mut acceptor = SchemaAcceptor::new();
        let ty = TypeDescriptor::parse("Option<FakeModel>").unwrap();

        let node = Visitor::Nullable
            .payload_visit(&collection, &mut acceptor, &ty, &STRATEGY)
            .unwrap();

        assert_eq!(node.reference_id(), Some("fakeModel"));
        assert!(node.nullable);
        assert!(acceptor.schemas.is_empty());
        assert!(acceptor.has_root("fakeModel"));
    }
}
