use typeschema_core::SchemaNode;

/// Free-form JSON accepts any object.
pub(super) fn dynamic() -> SchemaNode {
    SchemaNode::object()
}

#[cfg(test)]
mod tests {
    use super::super::Visitor;
    use super::super::fixtures::{STRATEGY, collection};
    use crate::acceptor::SchemaAcceptor;
    use crate::descriptor::TypeDescriptor;
    use rstest::rstest;
    use typeschema_core::{SchemaNode, SchemaType};

    #[rstest]
    #[case("bool", SchemaNode::boolean())]
    #[case("i32", SchemaNode::integer().with_format("int32"))]
    #[case("u64", SchemaNode::integer().with_format("uint64"))]
    #[case("usize", SchemaNode::integer())]
    #[case("f64", SchemaNode::number().with_format("double"))]
    #[case("String", SchemaNode::string())]
    #[case("&str", SchemaNode::string())]
    #[case("uuid::Uuid", SchemaNode::string().with_format("uuid"))]
    #[case("chrono::DateTime<chrono::Utc>", SchemaNode::string().with_format("date-time"))]
    #[case("NaiveDate", SchemaNode::string().with_format("date"))]
    #[case("()", SchemaNode::null())]
    fn primitive_schema(#[case] source: &str, #[case] expected: SchemaNode) {
        let collection = collection();
        let mut acceptor = SchemaAcceptor::new();
        let ty = TypeDescriptor::parse(source).unwrap();

        assert!(Visitor::Primitive.is_parameter_visitable(&ty, collection.catalog()));
        let payload = Visitor::Primitive
            .payload_visit(&collection, &mut acceptor, &ty, &STRATEGY)
            .unwrap();
        let parameter = Visitor::Primitive
            .parameter_visit(&collection, &ty, &STRATEGY)
            .unwrap();

        assert_eq!(payload, expected);
        assert_eq!(parameter, expected);
        assert!(acceptor.root_schemas.is_empty());
    }

    #[test]
    fn dynamic_is_a_bare_object() {
        let collection = collection();
        let mut acceptor = SchemaAcceptor::new();
        let ty = TypeDescriptor::parse("serde_json::Value").unwrap();

        assert!(Visitor::Dynamic.is_payload_visitable(&ty, collection.catalog()));
        assert!(!Visitor::Dynamic.is_parameter_visitable(&ty, collection.catalog()));

        let node = Visitor::Dynamic
            .payload_visit(&collection, &mut acceptor, &ty, &STRATEGY)
            .unwrap();
        assert_eq!(node.schema_type, Some(SchemaType::Object));
        assert!(node.properties.is_none());
        assert!(node.additional_properties.is_none());

        let err = Visitor::Dynamic
            .parameter_visit(&collection, &ty, &STRATEGY)
            .unwrap_err();
        assert!(err.is_unsupported_shape());
    }
}
