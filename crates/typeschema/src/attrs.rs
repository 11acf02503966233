//! Attribute extraction for catalog definitions.
//!
//! Reads the serde attributes that change a type's wire shape, plus the
//! `#[schema(visibility = "...")]` marker.

use crate::visibility::{VisibilityAttribute, VisibilityType};

/// Extract doc comments from attributes.
/// Returns concatenated doc comment string or None if no doc comments.
pub fn extract_doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let mut doc_lines = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("doc")
            && let syn::Meta::NameValue(meta_nv) = &attr.meta
            && let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit_str),
                ..
            }) = &meta_nv.value
        {
            let line = lit_str.value();
            // rustdoc keeps the space after `///`
            let trimmed = line.strip_prefix(' ').unwrap_or(&line);
            doc_lines.push(trimmed.to_string());
        }
    }

    if doc_lines.is_empty() {
        None
    } else {
        Some(doc_lines.join("\n"))
    }
}

/// Strips the `r#` prefix from raw identifiers.
pub fn strip_raw_prefix(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// Value of `key = "..."` inside `#[<namespace>(...)]`, first match wins.
fn extract_string_value(attrs: &[syn::Attribute], namespace: &str, key: &str) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident(namespace) {
            continue;
        }
        let mut found = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let value = meta.value()?;
                let lit: syn::LitStr = value.parse()?;
                found = Some(lit.value());
            } else if meta.input.peek(syn::Token![=]) {
                // Consume values of keys we don't care about
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _ = meta.parse_nested_meta(|nested| {
                    if nested.input.peek(syn::Token![=]) {
                        let _: syn::Expr = nested.value()?.parse()?;
                    }
                    Ok(())
                });
            }
            Ok(())
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Whether `#[<namespace>(flag)]` is present as a bare word.
fn has_flag(attrs: &[syn::Attribute], namespace: &str, flag: &str) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident(namespace) {
            return false;
        }
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.path.is_ident(flag) {
                found = true;
            }
            Ok(())
        });
        found
    })
}

pub fn extract_rename_all(attrs: &[syn::Attribute]) -> Option<String> {
    extract_string_value(attrs, "serde", "rename_all")
}

pub fn extract_field_rename(attrs: &[syn::Attribute]) -> Option<String> {
    extract_string_value(attrs, "serde", "rename")
}

/// `#[serde(skip)]`. `skip_serializing_if` and friends keep the field in the schema.
pub fn extract_skip(attrs: &[syn::Attribute]) -> bool {
    has_flag(attrs, "serde", "skip")
}

pub fn extract_flatten(attrs: &[syn::Attribute]) -> bool {
    has_flag(attrs, "serde", "flatten")
}

/// `#[schema(visibility = "important")]`
pub fn extract_visibility(attrs: &[syn::Attribute]) -> crate::Result<Option<VisibilityAttribute>> {
    extract_string_value(attrs, "schema", "visibility")
        .map(|value| value.parse::<VisibilityType>().map(VisibilityAttribute::new))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn field_attrs(source: &str) -> Vec<syn::Attribute> {
        let item: syn::ItemStruct = syn::parse_str(source).unwrap();
        match item.fields {
            syn::Fields::Named(named) => named.named[0].attrs.clone(),
            _ => panic!("expected named field"),
        }
    }

    #[test]
    fn doc_comments_are_joined() {
        let item: syn::ItemStruct = syn::parse_str(
            r"
            /// First line
            /// Second line
            struct User { id: i32 }
            ",
        )
        .unwrap();
        assert_eq!(
            extract_doc_comment(&item.attrs),
            Some("First line\nSecond line".to_string())
        );
    }

    #[rstest]
    #[case(r#"struct S { #[serde(rename = "userId")] id: i32 }"#, Some("userId"))]
    #[case(r#"struct S { #[serde(default, rename = "userId")] id: i32 }"#, Some("userId"))]
    #[case(r#"struct S { #[serde(rename_all = "camelCase")] id: i32 }"#, None)]
    #[case(r"struct S { id: i32 }", None)]
    fn field_rename(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            extract_field_rename(&field_attrs(source)).as_deref(),
            expected
        );
    }

    #[rstest]
    #[case(r"struct S { #[serde(skip)] id: i32 }", true)]
    #[case(r"struct S { #[serde(default, skip)] id: i32 }", true)]
    #[case(r#"struct S { #[serde(skip_serializing_if = "Option::is_none")] id: i32 }"#, false)]
    #[case(r"struct S { #[serde(skip_deserializing)] id: i32 }", false)]
    #[case(r"struct S { id: i32 }", false)]
    fn skip(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(extract_skip(&field_attrs(source)), expected);
    }

    #[rstest]
    #[case(r"struct S { #[serde(flatten)] meta: Meta }", true)]
    #[case(r#"struct S { #[serde(default, flatten, rename = "m")] meta: Meta }"#, true)]
    #[case(r"struct S { #[schema(flatten)] meta: Meta }", false)]
    #[case(r"struct S { meta: Meta }", false)]
    fn flatten(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(extract_flatten(&field_attrs(source)), expected);
    }

    #[test]
    fn rename_all_on_struct() {
        let item: syn::ItemStruct =
            syn::parse_str(r#"#[serde(deny_unknown_fields, rename_all = "snake_case")] struct S { id: i32 }"#)
                .unwrap();
        assert_eq!(extract_rename_all(&item.attrs).as_deref(), Some("snake_case"));
    }

    #[rstest]
    #[case(r#"struct S { #[schema(visibility = "important")] id: i32 }"#, Some(VisibilityType::Important))]
    #[case(r#"struct S { #[schema(visibility = "Advanced")] id: i32 }"#, Some(VisibilityType::Advanced))]
    #[case(r"struct S { id: i32 }", None)]
    fn visibility(#[case] source: &str, #[case] expected: Option<VisibilityType>) {
        let attribute = extract_visibility(&field_attrs(source)).unwrap();
        assert_eq!(attribute.map(|a| a.visibility), expected);
    }

    #[test]
    fn unknown_visibility_is_an_error() {
        let attrs = field_attrs(r#"struct S { #[schema(visibility = "hidden")] id: i32 }"#);
        assert!(extract_visibility(&attrs).is_err());
    }

    #[test]
    fn raw_prefix() {
        assert_eq!(strip_raw_prefix("r#type"), "type");
        assert_eq!(strip_raw_prefix("name"), "name");
    }
}
