//! Type descriptions fed to the visitors.
//!
//! A [`TypeDescriptor`] can be built by hand or parsed from a Rust type
//! expression such as `HashMap<String, Option<FakeModel>>`.

use std::fmt;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};
use typeschema_core::SchemaNode;

use crate::error::{Result, SchemaError};

/// Scalar types with a fixed inline schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    /// `i128`, `u128`, `isize`, `usize`: no standard format in the registry
    WideInteger,
    Float,
    Double,
    Decimal,
    String,
    Char,
    Uuid,
    DateTime,
    Date,
    Time,
    Duration,
    Uri,
    Binary,
    Unit,
}

impl PrimitiveType {
    /// Resolve a primitive from the last segment of a type path.
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        let primitive = match ident {
            "bool" => Self::Boolean,
            "i8" => Self::Int8,
            "i16" => Self::Int16,
            "i32" => Self::Int32,
            "i64" => Self::Int64,
            "u8" => Self::UInt8,
            "u16" => Self::UInt16,
            "u32" => Self::UInt32,
            "u64" => Self::UInt64,
            "i128" | "u128" | "isize" | "usize" => Self::WideInteger,
            "f32" => Self::Float,
            "f64" => Self::Double,
            "Decimal" => Self::Decimal,
            "String" | "str" => Self::String,
            "char" => Self::Char,
            "Uuid" => Self::Uuid,
            "DateTime" | "NaiveDateTime" | "OffsetDateTime" | "PrimitiveDateTime"
            | "SystemTime" => Self::DateTime,
            "NaiveDate" | "Date" => Self::Date,
            "NaiveTime" | "Time" => Self::Time,
            "Duration" => Self::Duration,
            "Url" | "Uri" => Self::Uri,
            "Bytes" => Self::Binary,
            _ => return None,
        };
        Some(primitive)
    }

    /// Inline schema for this primitive.
    #[must_use]
    pub fn schema(self) -> SchemaNode {
        match self {
            Self::Boolean => SchemaNode::boolean(),
            Self::Int8 => SchemaNode::integer().with_format("int8"),
            Self::Int16 => SchemaNode::integer().with_format("int16"),
            Self::Int32 => SchemaNode::integer().with_format("int32"),
            Self::Int64 => SchemaNode::integer().with_format("int64"),
            Self::UInt8 => SchemaNode::integer().with_format("uint8"),
            Self::UInt16 => SchemaNode::integer().with_format("uint16"),
            Self::UInt32 => SchemaNode::integer().with_format("uint32"),
            Self::UInt64 => SchemaNode::integer().with_format("uint64"),
            Self::WideInteger => SchemaNode::integer(),
            Self::Float => SchemaNode::number().with_format("float"),
            Self::Double => SchemaNode::number().with_format("double"),
            Self::Decimal => SchemaNode::number().with_format("decimal"),
            Self::String => SchemaNode::string(),
            Self::Char => SchemaNode::string().with_format("char"),
            Self::Uuid => SchemaNode::string().with_format("uuid"),
            Self::DateTime => SchemaNode::string().with_format("date-time"),
            Self::Date => SchemaNode::string().with_format("date"),
            Self::Time => SchemaNode::string().with_format("time"),
            Self::Duration => SchemaNode::string().with_format("duration"),
            Self::Uri => SchemaNode::string().with_format("uri"),
            Self::Binary => SchemaNode::string().with_format("binary"),
            Self::Unit => SchemaNode::null(),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::UInt8 => "u8",
            Self::UInt16 => "u16",
            Self::UInt32 => "u32",
            Self::UInt64 => "u64",
            Self::WideInteger => "i128",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::Char => "char",
            Self::Uuid => "Uuid",
            Self::DateTime => "DateTime",
            Self::Date => "NaiveDate",
            Self::Time => "NaiveTime",
            Self::Duration => "Duration",
            Self::Uri => "Url",
            Self::Binary => "Bytes",
            Self::Unit => "()",
        }
    }
}

/// Map-shaped containers. Keys are always treated as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapFamily {
    /// `HashMap`, `IndexMap`
    HashMap,
    /// `BTreeMap`
    BTreeMap,
    /// Shared borrow of a map
    ReadOnlyView,
    /// A single key/value entry, written as a `(K, V)` tuple
    KeyValuePair,
}

/// Sequence-shaped containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListFamily {
    /// `Vec`, `VecDeque`, `LinkedList`
    Vec,
    /// `HashSet`, `BTreeSet`, `IndexSet`
    Set,
    /// `[T]`, `[T; N]`
    Slice,
}

/// Description of a type whose schema is to be derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(PrimitiveType),
    /// `Option<T>`
    Nullable(Box<TypeDescriptor>),
    Map {
        family: MapFamily,
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    List {
        family: ListFamily,
        item: Box<TypeDescriptor>,
    },
    /// Free-form JSON (`serde_json::Value`)
    Dynamic,
    /// User-defined type, resolved against a [`TypeCatalog`](crate::TypeCatalog)
    Named(String),
}

impl TypeDescriptor {
    #[must_use]
    pub fn nullable(inner: Self) -> Self {
        Self::Nullable(Box::new(inner))
    }

    #[must_use]
    pub fn map(family: MapFamily, key: Self, value: Self) -> Self {
        Self::Map {
            family,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn list(family: ListFamily, item: Self) -> Self {
        Self::List {
            family,
            item: Box::new(item),
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Parse a Rust type expression.
    pub fn parse(source: &str) -> Result<Self> {
        let ty: Type = syn::parse_str(source)?;
        Self::try_from(&ty)
    }

    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::Nullable(_) | Self::Map { .. } | Self::List { .. })
    }

    /// Type arguments in declaration order (`[key, value]` for maps).
    #[must_use]
    pub fn generic_arguments(&self) -> Vec<&Self> {
        match self {
            Self::Nullable(inner) => vec![inner.as_ref()],
            Self::Map { key, value, .. } => vec![key.as_ref(), value.as_ref()],
            Self::List { item, .. } => vec![item.as_ref()],
            Self::Primitive(_) | Self::Dynamic | Self::Named(_) => Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_nullable_wrapper(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Whether this is a map-like container of key/value pairs.
    #[must_use]
    pub const fn is_enumerable_of_pairs(&self) -> bool {
        matches!(self, Self::Map { .. })
    }

    #[must_use]
    pub const fn is_user_defined(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// One level of nullable unwrapped; other types are returned as-is.
    #[must_use]
    pub fn underlying(&self) -> &Self {
        match self {
            Self::Nullable(inner) => inner.as_ref(),
            other => other,
        }
    }

    #[must_use]
    pub fn declared_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => f.write_str(primitive.name()),
            Self::Nullable(inner) => write!(f, "Option<{inner}>"),
            Self::Map { family, key, value } => match family {
                MapFamily::HashMap => write!(f, "HashMap<{key}, {value}>"),
                MapFamily::BTreeMap => write!(f, "BTreeMap<{key}, {value}>"),
                MapFamily::ReadOnlyView => write!(f, "&HashMap<{key}, {value}>"),
                MapFamily::KeyValuePair => write!(f, "({key}, {value})"),
            },
            Self::List { family, item } => match family {
                ListFamily::Vec => write!(f, "Vec<{item}>"),
                ListFamily::Set => write!(f, "HashSet<{item}>"),
                ListFamily::Slice => write!(f, "[{item}]"),
            },
            Self::Dynamic => f.write_str("serde_json::Value"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<PrimitiveType> for TypeDescriptor {
    fn from(primitive: PrimitiveType) -> Self {
        Self::Primitive(primitive)
    }
}

impl TryFrom<&Type> for TypeDescriptor {
    type Error = SchemaError;

    fn try_from(ty: &Type) -> Result<Self> {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                let path = &type_path.path;
                let Some(segment) = path.segments.last() else {
                    return Err(SchemaError::unsupported(render(ty), "empty type path"));
                };
                let ident = segment.ident.to_string();

                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    let types: Vec<&Type> = args
                        .args
                        .iter()
                        .filter_map(|arg| match arg {
                            GenericArgument::Type(ty) => Some(ty),
                            _ => None,
                        })
                        .collect();
                    return parse_generic(ty, &ident, &types);
                }

                // serde_json::Value, or a bare `JsonValue` alias
                let is_json_value = ident == "JsonValue"
                    || (ident == "Value"
                        && path.segments.len() > 1
                        && path.segments[path.segments.len() - 2].ident == "serde_json");
                if is_json_value {
                    return Ok(Self::Dynamic);
                }

                if let Some(primitive) = PrimitiveType::from_ident(&ident) {
                    return Ok(Self::Primitive(primitive));
                }

                match ident.as_str() {
                    "Vec" | "Option" | "HashMap" | "BTreeMap" | "Box" => Err(
                        SchemaError::unsupported(ident, "missing type arguments"),
                    ),
                    _ => Ok(Self::Named(ident)),
                }
            }
            Type::Reference(type_ref) => {
                let inner = Self::try_from(type_ref.elem.as_ref())?;
                match inner {
                    Self::Map { key, value, .. } if type_ref.mutability.is_none() => Ok(Self::Map {
                        family: MapFamily::ReadOnlyView,
                        key,
                        value,
                    }),
                    other => Ok(other),
                }
            }
            Type::Slice(slice) => Ok(Self::list(
                ListFamily::Slice,
                Self::try_from(slice.elem.as_ref())?,
            )),
            Type::Array(array) => Ok(Self::list(
                ListFamily::Slice,
                Self::try_from(array.elem.as_ref())?,
            )),
            Type::Paren(paren) => Self::try_from(paren.elem.as_ref()),
            Type::Group(group) => Self::try_from(group.elem.as_ref()),
            Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(Self::Primitive(PrimitiveType::Unit)),
            Type::Tuple(tuple) if tuple.elems.len() == 2 => Ok(Self::map(
                MapFamily::KeyValuePair,
                Self::try_from(&tuple.elems[0])?,
                Self::try_from(&tuple.elems[1])?,
            )),
            _ => Err(SchemaError::unsupported(
                render(ty),
                "only paths, references, slices, arrays and pairs describe schema types",
            )),
        }
    }
}

fn parse_generic(ty: &Type, ident: &str, args: &[&Type]) -> Result<TypeDescriptor> {
    let arity = |expected: usize| -> Result<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(SchemaError::unsupported(
                render(ty),
                format!("expected {expected} type argument(s), found {}", args.len()),
            ))
        }
    };

    match ident {
        "Box" | "Rc" | "Arc" | "Cow" => {
            arity(1)?;
            TypeDescriptor::try_from(args[0])
        }
        "Option" => {
            arity(1)?;
            Ok(TypeDescriptor::nullable(TypeDescriptor::try_from(args[0])?))
        }
        "Vec" | "VecDeque" | "LinkedList" => {
            arity(1)?;
            Ok(TypeDescriptor::list(
                ListFamily::Vec,
                TypeDescriptor::try_from(args[0])?,
            ))
        }
        "HashSet" | "BTreeSet" | "IndexSet" => {
            arity(1)?;
            Ok(TypeDescriptor::list(
                ListFamily::Set,
                TypeDescriptor::try_from(args[0])?,
            ))
        }
        "HashMap" | "IndexMap" | "BTreeMap" => {
            arity(2)?;
            let family = if ident == "BTreeMap" {
                MapFamily::BTreeMap
            } else {
                MapFamily::HashMap
            };
            Ok(TypeDescriptor::map(
                family,
                TypeDescriptor::try_from(args[0])?,
                TypeDescriptor::try_from(args[1])?,
            ))
        }
        // DateTime<Utc> and friends carry a type argument but stay scalar
        _ => PrimitiveType::from_ident(ident)
            .map(TypeDescriptor::Primitive)
            .ok_or_else(|| {
                SchemaError::unsupported(render(ty), "generic user-defined types are not supported")
            }),
    }
}

/// Render a syn type for messages. quote!() spaces out `::` and `<`, so strip them.
fn render(ty: &Type) -> String {
    let tokens: TokenStream = quote!(#ty);
    tokens.to_string().replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use typeschema_core::SchemaType;

    #[rstest]
    #[case("i32", SchemaType::Integer, Some("int32"))]
    #[case("i64", SchemaType::Integer, Some("int64"))]
    #[case("u8", SchemaType::Integer, Some("uint8"))]
    #[case("usize", SchemaType::Integer, None)]
    #[case("f32", SchemaType::Number, Some("float"))]
    #[case("f64", SchemaType::Number, Some("double"))]
    #[case("bool", SchemaType::Boolean, None)]
    #[case("String", SchemaType::String, None)]
    #[case("&str", SchemaType::String, None)]
    #[case("chrono::DateTime", SchemaType::String, Some("date-time"))]
    #[case("NaiveDate", SchemaType::String, Some("date"))]
    #[case("uuid::Uuid", SchemaType::String, Some("uuid"))]
    #[case("()", SchemaType::Null, None)]
    fn parse_primitives(
        #[case] source: &str,
        #[case] expected_type: SchemaType,
        #[case] expected_format: Option<&str>,
    ) {
        let TypeDescriptor::Primitive(primitive) = TypeDescriptor::parse(source).unwrap() else {
            panic!("expected primitive for {source}");
        };
        let schema = primitive.schema();
        assert_eq!(schema.schema_type, Some(expected_type));
        assert_eq!(schema.format.as_deref(), expected_format);
    }

    #[rstest]
    #[case("HashMap<String, String>", MapFamily::HashMap)]
    #[case("std::collections::HashMap<String, FakeModel>", MapFamily::HashMap)]
    #[case("IndexMap<String, i32>", MapFamily::HashMap)]
    #[case("BTreeMap<String, FakeModel>", MapFamily::BTreeMap)]
    #[case("&HashMap<String, String>", MapFamily::ReadOnlyView)]
    #[case("&BTreeMap<String, String>", MapFamily::ReadOnlyView)]
    #[case("(String, FakeModel)", MapFamily::KeyValuePair)]
    #[case("(&str, Option<i32>)", MapFamily::KeyValuePair)]
    fn parse_map_families(#[case] source: &str, #[case] expected: MapFamily) {
        let descriptor = TypeDescriptor::parse(source).unwrap();
        assert!(descriptor.is_enumerable_of_pairs());
        assert!(descriptor.is_generic());
        let TypeDescriptor::Map { family, key, .. } = descriptor else {
            panic!("expected map for {source}");
        };
        assert_eq!(family, expected);
        assert_eq!(*key, TypeDescriptor::Primitive(PrimitiveType::String));
    }

    #[test]
    fn mutable_map_borrow_is_not_read_only_view() {
        let descriptor = TypeDescriptor::parse("&mut HashMap<String, i32>").unwrap();
        assert!(matches!(
            descriptor,
            TypeDescriptor::Map {
                family: MapFamily::HashMap,
                ..
            }
        ));
    }

    #[rstest]
    #[case("Vec<i32>", ListFamily::Vec)]
    #[case("VecDeque<String>", ListFamily::Vec)]
    #[case("HashSet<String>", ListFamily::Set)]
    #[case("BTreeSet<u64>", ListFamily::Set)]
    #[case("[u8]", ListFamily::Slice)]
    #[case("[f64; 3]", ListFamily::Slice)]
    fn parse_list_families(#[case] source: &str, #[case] expected: ListFamily) {
        let TypeDescriptor::List { family, .. } = TypeDescriptor::parse(source).unwrap() else {
            panic!("expected list for {source}");
        };
        assert_eq!(family, expected);
    }

    #[test]
    fn parse_nullable_unwraps_transparent_pointers() {
        let descriptor = TypeDescriptor::parse("Option<Box<FakeModel>>").unwrap();
        assert!(descriptor.is_nullable_wrapper());
        assert_eq!(descriptor.underlying(), &TypeDescriptor::named("FakeModel"));
        assert_eq!(descriptor.generic_arguments(), vec![&TypeDescriptor::named("FakeModel")]);
    }

    #[rstest]
    #[case("serde_json::Value")]
    #[case("JsonValue")]
    fn parse_dynamic(#[case] source: &str) {
        assert_eq!(TypeDescriptor::parse(source).unwrap(), TypeDescriptor::Dynamic);
    }

    #[test]
    fn bare_value_is_a_user_type() {
        assert_eq!(
            TypeDescriptor::parse("Value").unwrap(),
            TypeDescriptor::named("Value")
        );
    }

    #[rstest]
    #[case("Wrapper<String>")]
    #[case("(i32, bool, u8)")]
    #[case("(String,)")]
    #[case("fn(i32) -> i32")]
    #[case("Option<String, i32>")]
    #[case("HashMap<String>")]
    #[case("Vec")]
    fn parse_unsupported(#[case] source: &str) {
        let err = TypeDescriptor::parse(source).unwrap_err();
        assert!(
            matches!(err, SchemaError::UnsupportedType { .. }),
            "unexpected error for {source}: {err}"
        );
    }

    #[test]
    fn parse_invalid_syntax() {
        assert!(matches!(
            TypeDescriptor::parse("HashMap<"),
            Err(SchemaError::InvalidSyntax(_))
        ));
    }

    #[rstest]
    #[case("HashMap<String, FakeModel>", "HashMap<String, FakeModel>")]
    #[case("Option<chrono::DateTime<Utc>>", "Option<DateTime>")]
    #[case("&HashMap<String, i32>", "&HashMap<String, i32>")]
    #[case("Vec<Option<u8>>", "Vec<Option<u8>>")]
    #[case("(String, FakeModel)", "(String, FakeModel)")]
    fn declared_name(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(TypeDescriptor::parse(source).unwrap().declared_name(), expected);
    }

    #[rstest]
    #[case("HashMap<String, FakeModel>")]
    #[case("BTreeMap<String, Vec<i32>>")]
    #[case("&HashMap<String, String>")]
    #[case("(String, Option<FakeModel>)")]
    fn declared_name_parses_back(#[case] source: &str) {
        let descriptor = TypeDescriptor::parse(source).unwrap();
        let reparsed = TypeDescriptor::parse(&descriptor.declared_name()).unwrap();
        assert_eq!(reparsed, descriptor);
    }

    #[test]
    fn primitives_and_named_types_are_not_generic() {
        assert!(!TypeDescriptor::named("FakeModel").is_generic());
        assert!(TypeDescriptor::named("FakeModel").is_user_defined());
        assert!(TypeDescriptor::from(PrimitiveType::Int32).generic_arguments().is_empty());
    }
}
