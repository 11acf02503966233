//! Document-wide definitions table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::SchemaNode;

/// Two different definitions were offered under the same component name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("component schema `{name}` is already defined with different content")]
pub struct DefinitionConflict {
    pub name: String,
}

/// `OpenAPI` Components (reusable components)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Schema definitions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, SchemaNode>,
}

impl Components {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge definitions into this table.
    ///
    /// A name that is already present with identical content is skipped, so
    /// merging the same registry twice is a no-op. Returns how many new names
    /// were added. On conflict the existing entry is kept and merging stops.
    pub fn merge_schemas<I>(&mut self, schemas: I) -> Result<usize, DefinitionConflict>
    where
        I: IntoIterator<Item = (String, SchemaNode)>,
    {
        let mut added = 0;
        for (name, schema) in schemas {
            match self.schemas.get(&name) {
                Some(existing) if *existing == schema => {}
                Some(_) => return Err(DefinitionConflict { name }),
                None => {
                    self.schemas.insert(name, schema);
                    added += 1;
                }
            }
        }
        Ok(added)
    }

    /// Merge another components table into this one.
    pub fn merge(&mut self, other: Self) -> Result<usize, DefinitionConflict> {
        self.merge_schemas(other.schemas)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
