//! Schema node definitions

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Prefix of every component schema reference path.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// Kind of component a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    Schema,
}

/// Pointer to a named definition registered in the document's components.
///
/// The `id` is the key under which the definition is stored, so a serializer
/// can resolve the pointer without further lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: ReferenceType,
    pub id: String,
}

impl Reference {
    /// Create a component schema reference
    #[must_use]
    pub fn schema(id: impl Into<String>) -> Self {
        Self {
            kind: ReferenceType::Schema,
            id: id.into(),
        }
    }

    /// Reference path (e.g., "#/components/schemas/user")
    #[must_use]
    pub fn ref_path(&self) -> String {
        match self.kind {
            ReferenceType::Schema => format!("{SCHEMA_REF_PREFIX}{}", self.id),
        }
    }

    /// Parse a reference path back into a reference.
    #[must_use]
    pub fn from_ref_path(path: &str) -> Option<Self> {
        path.strip_prefix(SCHEMA_REF_PREFIX)
            .filter(|id| !id.is_empty())
            .map(Self::schema)
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.ref_path())
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Self::from_ref_path(&path).ok_or_else(|| {
            serde::de::Error::custom(format!("unsupported reference path: {path}"))
        })
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if mandates &T
fn is_false(value: &bool) -> bool {
    !*value
}

/// A derived schema: either an inline shape or a pointer to a named definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Named definition this node stands for ($ref)
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Schema type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Format (for numbers or strings)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nullable flag
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Allowed values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    /// Array item schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    /// Unique items flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    /// Property definitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    /// List of required properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Schema of map values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaNode>>,
    /// Vendor extensions (`x-*` keys), written next to the other keys
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl SchemaNode {
    /// Create a new schema
    #[must_use]
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Create a string schema
    #[must_use]
    pub fn string() -> Self {
        Self::new(SchemaType::String)
    }

    /// Create an integer schema
    #[must_use]
    pub fn integer() -> Self {
        Self::new(SchemaType::Integer)
    }

    /// Create a number schema
    #[must_use]
    pub fn number() -> Self {
        Self::new(SchemaType::Number)
    }

    /// Create a boolean schema
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(SchemaType::Boolean)
    }

    /// Create a null schema
    #[must_use]
    pub fn null() -> Self {
        Self::new(SchemaType::Null)
    }

    /// Create a bare object schema (no declared properties)
    #[must_use]
    pub fn object() -> Self {
        Self::new(SchemaType::Object)
    }

    /// Create an array schema
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(SchemaType::Array)
        }
    }

    /// Create a string-keyed map schema
    #[must_use]
    pub fn map(value: Self) -> Self {
        Self {
            additional_properties: Some(Box::new(value)),
            ..Self::object()
        }
    }

    /// Create a reference to the component schema registered under `id`
    #[must_use]
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            reference: Some(Reference::schema(id)),
            ..Self::object()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Id of the referenced definition, if this is a reference node.
    #[must_use]
    pub fn reference_id(&self) -> Option<&str> {
        self.reference.as_ref().map(|r| r.id.as_str())
    }

    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;
    use rstest::rstest;

    #[rstest]
    #[case(SchemaNode::string(), SchemaType::String)]
    #[case(SchemaNode::integer(), SchemaType::Integer)]
    #[case(SchemaNode::number(), SchemaType::Number)]
    #[case(SchemaNode::boolean(), SchemaType::Boolean)]
    #[case(SchemaNode::null(), SchemaType::Null)]
    #[case(SchemaNode::object(), SchemaType::Object)]
    fn primitive_helpers_set_schema_type(#[case] schema: SchemaNode, #[case] expected: SchemaType) {
        assert_eq!(schema.schema_type, Some(expected));
        assert!(!schema.is_reference());
    }

    #[test]
    fn array_helper_sets_type_and_items() {
        let schema = SchemaNode::array(SchemaNode::boolean());

        assert_eq!(schema.schema_type, Some(SchemaType::Array));
        let items = schema.items.expect("items should be set");
        assert_eq!(items.schema_type, Some(SchemaType::Boolean));
    }

    #[test]
    fn map_helper_wraps_value_schema() {
        let schema = SchemaNode::map(SchemaNode::reference("fakeModel"));

        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        assert_eq!(schema.format, None);
        let value = schema.additional_properties.expect("additionalProperties");
        assert_eq!(value.schema_type, Some(SchemaType::Object));
        assert_eq!(value.reference_id(), Some("fakeModel"));
    }

    #[test]
    fn reference_path_round_trips() {
        let reference = Reference::schema("fakeModel");
        assert_eq!(reference.ref_path(), "#/components/schemas/fakeModel");
        assert_eq!(
            Reference::from_ref_path("#/components/schemas/fakeModel"),
            Some(reference)
        );
        assert_eq!(Reference::from_ref_path("#/components/schemas/"), None);
        assert_eq!(Reference::from_ref_path("#/definitions/fakeModel"), None);
    }

    #[test]
    fn serialize_nullable_date_time() {
        let schema = SchemaNode {
            nullable: true,
            ..SchemaNode::string().with_format("date-time")
        };
        assert_json_snapshot!(schema, @r#"
        {
          "type": "string",
          "format": "date-time",
          "nullable": true
        }
        "#);
    }

    #[test]
    fn serialize_map_of_reference_with_extension() {
        let mut schema = SchemaNode::map(SchemaNode::reference("fakeModel"));
        schema
            .extensions
            .insert("x-ms-visibility".to_string(), "important".into());
        assert_json_snapshot!(schema, @r##"
        {
          "type": "object",
          "additionalProperties": {
            "$ref": "#/components/schemas/fakeModel",
            "type": "object"
          },
          "x-ms-visibility": "important"
        }
        "##);
    }

    #[test]
    fn non_nullable_flag_is_omitted() {
        let json = serde_json::to_string(&SchemaNode::integer().with_format("int32")).unwrap();
        assert_eq!(json, r#"{"type":"integer","format":"int32"}"#);
    }

    #[test]
    fn deserialize_collects_extensions_and_reference() {
        let json = r##"{
            "$ref": "#/components/schemas/user",
            "type": "object",
            "nullable": true,
            "x-ms-visibility": "advanced"
        }"##;
        let schema: SchemaNode = serde_json::from_str(json).unwrap();

        assert_eq!(schema.reference_id(), Some("user"));
        assert!(schema.nullable);
        assert_eq!(
            schema.extension("x-ms-visibility"),
            Some(&serde_json::Value::String("advanced".to_string()))
        );
    }

    #[test]
    fn deserialize_rejects_foreign_reference_path() {
        let json = r##"{"$ref": "#/definitions/user"}"##;
        assert!(serde_json::from_str::<SchemaNode>(json).is_err());
    }
}
