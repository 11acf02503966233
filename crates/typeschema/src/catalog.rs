//! User-defined type definitions that `Named` descriptors resolve against.
//!
//! Definitions are added by hand or read from Rust source, in which case
//! serde's `rename`, `rename_all` and `skip` attributes shape the properties.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use syn::{Fields, Item};

use crate::attrs::{
    extract_doc_comment, extract_field_rename, extract_flatten, extract_rename_all, extract_skip,
    extract_visibility, strip_raw_prefix,
};
use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SchemaError};
use crate::naming::{NamingConvention, NamingStrategy};
use crate::visibility::VisibilityAttribute;

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    /// Name was fixed by the definition (`rename`/`rename_all`); the naming strategy leaves it alone.
    pub renamed: bool,
    pub ty: TypeDescriptor,
    pub description: Option<String>,
    pub visibility: Option<VisibilityAttribute>,
    /// `#[serde(flatten)]`: the members of `ty` are inlined into the parent.
    pub flatten: bool,
}

impl PropertyDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            renamed: false,
            ty,
            description: None,
            visibility: None,
            flatten: false,
        }
    }

    #[must_use]
    pub fn renamed(mut self) -> Self {
        self.renamed = true;
        self
    }

    #[must_use]
    pub fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: impl Into<VisibilityAttribute>) -> Self {
        self.visibility = Some(visibility.into());
        self
    }

    /// Name as it appears in the document.
    #[must_use]
    pub fn wire_name(&self, strategy: &dyn NamingStrategy) -> String {
        if self.renamed {
            self.name.clone()
        } else {
            strategy.name(&self.name)
        }
    }
}

/// A struct with named properties.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeType {
    pub name: String,
    pub description: Option<String>,
    pub properties: Vec<PropertyDef>,
}

impl CompositeType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: String,
    pub renamed: bool,
}

impl EnumVariant {
    #[must_use]
    pub fn wire_name(&self, strategy: &dyn NamingStrategy) -> String {
        if self.renamed {
            self.name.clone()
        } else {
            strategy.name(&self.name)
        }
    }
}

/// A fieldless enum, serialized as one of its variant names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<EnumVariant>,
}

impl EnumType {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            variants: variants
                .into_iter()
                .map(|v| EnumVariant {
                    name: v.into(),
                    renamed: false,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Composite(CompositeType),
    Enum(EnumType),
}

impl TypeDefinition {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Composite(composite) => &composite.name,
            Self::Enum(enum_type) => &enum_type.name,
        }
    }
}

/// Registry of user-defined types, keyed by declared name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeCatalog {
    definitions: BTreeMap<String, TypeDefinition>,
}

impl TypeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every supported struct and enum in `source`.
    pub fn from_source(source: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.add_source(source)?;
        Ok(catalog)
    }

    /// Read and parse a Rust source file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read type definitions: {}", path.display()))?;
        Self::from_source(&source)
            .with_context(|| format!("Failed to parse type definitions: {}", path.display()))
    }

    /// Add the definitions found in `source`; returns how many were added.
    ///
    /// Items the engine cannot describe (generic structs, tuple structs, enums
    /// with data) are skipped with a warning. Invalid syntax fails the whole call.
    pub fn add_source(&mut self, source: &str) -> Result<usize> {
        let file = syn::parse_file(source)?;
        let mut added = 0;
        self.add_items(&file.items, &mut added);
        Ok(added)
    }

    fn add_items(&mut self, items: &[Item], added: &mut usize) {
        for item in items {
            let parsed = match item {
                Item::Struct(item_struct) => parse_struct(item_struct).map(TypeDefinition::Composite),
                Item::Enum(item_enum) => parse_enum(item_enum).map(TypeDefinition::Enum),
                Item::Mod(item_mod) => {
                    if let Some((_, content)) = &item_mod.content {
                        self.add_items(content, added);
                    }
                    continue;
                }
                _ => continue,
            };
            match parsed {
                Ok(definition) => {
                    log::debug!("catalog: registered `{}`", definition.name());
                    self.insert(definition);
                    *added += 1;
                }
                Err(e) => log::warn!("catalog: skipping item: {e}"),
            }
        }
    }

    /// Insert a definition, returning the one it replaced.
    pub fn insert(&mut self, definition: TypeDefinition) -> Option<TypeDefinition> {
        self.definitions
            .insert(definition.name().to_string(), definition)
    }

    pub fn insert_composite(&mut self, composite: CompositeType) -> Option<TypeDefinition> {
        self.insert(TypeDefinition::Composite(composite))
    }

    pub fn insert_enum(&mut self, enum_type: EnumType) -> Option<TypeDefinition> {
        self.insert(TypeDefinition::Enum(enum_type))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    #[must_use]
    pub fn composite(&self, name: &str) -> Option<&CompositeType> {
        match self.definitions.get(name)? {
            TypeDefinition::Composite(composite) => Some(composite),
            TypeDefinition::Enum(_) => None,
        }
    }

    #[must_use]
    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        match self.definitions.get(name)? {
            TypeDefinition::Enum(enum_type) => Some(enum_type),
            TypeDefinition::Composite(_) => None,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn rename_rule(attrs: &[syn::Attribute], type_name: &str) -> Option<NamingConvention> {
    let rule = extract_rename_all(attrs)?;
    let convention = NamingConvention::from_rename_all(&rule);
    if convention.is_none() {
        log::warn!("catalog: `{type_name}` uses unsupported rename_all = \"{rule}\", ignoring it");
    }
    convention
}

/// Resolve a member name: explicit rename, then `rename_all`, then left to the strategy.
fn member_name(
    attrs: &[syn::Attribute],
    ident: &syn::Ident,
    rule: Option<NamingConvention>,
) -> (String, bool) {
    let raw = ident.to_string();
    let raw = strip_raw_prefix(&raw);
    if let Some(renamed) = extract_field_rename(attrs) {
        (renamed, true)
    } else if let Some(rule) = rule {
        (rule.name(raw), true)
    } else {
        (raw.to_string(), false)
    }
}

fn parse_struct(item: &syn::ItemStruct) -> Result<CompositeType> {
    let name = item.ident.to_string();
    if item.generics.type_params().next().is_some() {
        return Err(SchemaError::unsupported(
            name,
            "generic user-defined types are not supported",
        ));
    }

    let rule = rename_rule(&item.attrs, &name);
    let mut properties = Vec::new();
    match &item.fields {
        Fields::Named(fields_named) => {
            for field in &fields_named.named {
                if extract_skip(&field.attrs) {
                    continue;
                }
                let Some(ident) = &field.ident else {
                    continue;
                };
                let field_shape = TypeDescriptor::try_from(&field.ty)
                    .and_then(|ty| Ok((ty, extract_visibility(&field.attrs)?)));
                let (ty, visibility) = match field_shape {
                    Ok(shape) => shape,
                    Err(e) => {
                        log::warn!("catalog: skipping field `{ident}` of `{name}`: {e}");
                        continue;
                    }
                };
                let (prop_name, renamed) = member_name(&field.attrs, ident, rule);
                properties.push(PropertyDef {
                    name: prop_name,
                    renamed,
                    ty,
                    description: extract_doc_comment(&field.attrs),
                    visibility,
                    flatten: extract_flatten(&field.attrs),
                });
            }
        }
        Fields::Unit => {}
        Fields::Unnamed(_) => {
            return Err(SchemaError::unsupported(name, "tuple structs have no named properties"));
        }
    }

    Ok(CompositeType {
        description: extract_doc_comment(&item.attrs),
        name,
        properties,
    })
}

fn parse_enum(item: &syn::ItemEnum) -> Result<EnumType> {
    let name = item.ident.to_string();
    let rule = rename_rule(&item.attrs, &name);
    let mut variants = Vec::new();
    for variant in &item.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(SchemaError::unsupported(
                name,
                format!("variant `{}` carries data", variant.ident),
            ));
        }
        if extract_skip(&variant.attrs) {
            continue;
        }
        let (variant_name, renamed) = member_name(&variant.attrs, &variant.ident, rule);
        variants.push(EnumVariant {
            name: variant_name,
            renamed,
        });
    }

    Ok(EnumType {
        description: extract_doc_comment(&item.attrs),
        name,
        variants,
    })
}
