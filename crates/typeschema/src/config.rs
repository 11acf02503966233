use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::naming::NamingConvention;

/// Nesting depth past which derivation degrades to a bare object.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options shared by every derivation pass of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SchemaOptions {
    /// Casing applied to type names, property names and enumerants
    pub naming: NamingConvention,
    /// Maximum nesting depth of the payload path
    pub max_depth: usize,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            naming: NamingConvention::CamelCase,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SchemaOptions {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse options file: {}", path.display()))
    }
}
