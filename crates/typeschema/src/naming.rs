//! Naming strategies applied to type names, property names and enumerants.
//!
//! The engine only consumes [`NamingStrategy`]; [`NamingConvention`] covers the
//! conventions serde's `rename_all` understands so callers rarely need their own.

use serde::Deserialize;

/// Pure renaming function applied to identifiers before they reach the document.
pub trait NamingStrategy: Send + Sync {
    fn name(&self, identifier: &str) -> String;
}

impl<F> NamingStrategy for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn name(&self, identifier: &str) -> String {
        self(identifier)
    }
}

/// Casing conventions, spelled the way serde's `rename_all` spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum NamingConvention {
    /// Identifiers are left untouched
    #[serde(rename = "default")]
    Default,
    #[default]
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "kebab-case")]
    KebabCase,
    #[serde(rename = "lowercase")]
    LowerCase,
    #[serde(rename = "UPPERCASE")]
    UpperCase,
    #[serde(rename = "SCREAMING_SNAKE_CASE")]
    ScreamingSnakeCase,
    #[serde(rename = "SCREAMING-KEBAB-CASE")]
    ScreamingKebabCase,
}

impl NamingConvention {
    /// Parse a serde `rename_all` value.
    #[must_use]
    pub fn from_rename_all(rule: &str) -> Option<Self> {
        match rule {
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "lowercase" => Some(Self::LowerCase),
            "UPPERCASE" => Some(Self::UpperCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "SCREAMING-KEBAB-CASE" => Some(Self::ScreamingKebabCase),
            _ => None,
        }
    }
}

impl NamingStrategy for NamingConvention {
    fn name(&self, identifier: &str) -> String {
        let identifier = identifier.strip_prefix("r#").unwrap_or(identifier);
        match self {
            Self::Default => identifier.to_string(),
            Self::CamelCase => to_camel_case(identifier),
            Self::PascalCase => to_pascal_case(identifier),
            Self::SnakeCase => to_separated_lower(identifier, '_'),
            Self::KebabCase => to_separated_lower(identifier, '-'),
            Self::LowerCase => identifier.to_lowercase(),
            Self::UpperCase => identifier.to_uppercase(),
            Self::ScreamingSnakeCase => to_separated_lower(identifier, '_').to_uppercase(),
            Self::ScreamingKebabCase => to_separated_lower(identifier, '-').to_uppercase(),
        }
    }
}

// Leading acronyms stay in the first word: "XMLParser" -> "xmlParser".
fn to_camel_case(identifier: &str) -> String {
    let mut result = String::with_capacity(identifier.len());
    let mut capitalize_next = false;
    let mut in_first_word = true;
    let chars: Vec<char> = identifier.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' {
            capitalize_next = !result.is_empty();
            in_first_word = result.is_empty();
        } else if in_first_word {
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if ch.is_uppercase() && next_is_lower && i > 0 {
                in_first_word = false;
                result.push(ch);
            } else {
                result.extend(ch.to_lowercase());
            }
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

fn to_pascal_case(identifier: &str) -> String {
    let camel = to_camel_case(identifier);
    let mut chars = camel.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn to_separated_lower(identifier: &str, separator: char) -> String {
    let mut result = String::with_capacity(identifier.len() + 4);
    let chars: Vec<char> = identifier.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' {
            if !result.is_empty() && !result.ends_with(separator) {
                result.push(separator);
            }
        } else if ch.is_uppercase() {
            let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let acronym_end = i > 0 && chars[i - 1].is_uppercase() && next_is_lower;
            if (prev_is_lower || acronym_end) && !result.ends_with(separator) {
                result.push(separator);
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
