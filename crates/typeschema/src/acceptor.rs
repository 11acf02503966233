//! Sink for visitor output.

use std::collections::{BTreeMap, BTreeSet};

use typeschema_core::SchemaNode;

use crate::error::{Result, SchemaError};

/// Outcome of [`SchemaAcceptor::reserve_root`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSlot {
    /// The id was free; a placeholder now holds it until `complete_root`.
    Reserved,
    /// The same type already registered the id (finished or still being built).
    Existing,
}

/// Collects the schemas produced by one top-level visit.
///
/// `schemas` is keyed by the parameter or property name handed to the visit.
/// `root_schemas` holds named definitions, keyed by the reference id that
/// points at them; registering the same type twice is a no-op.
#[derive(Debug, Default)]
pub struct SchemaAcceptor {
    pub schemas: BTreeMap<String, SchemaNode>,
    pub root_schemas: BTreeMap<String, SchemaNode>,
    owners: BTreeMap<String, String>,
    pending: BTreeSet<String>,
    depth: usize,
}

impl SchemaAcceptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from definitions already collected elsewhere, so they are referenced
    /// instead of rebuilt. Their owner is taken to be their own id.
    #[must_use]
    pub fn with_root_schemas(root_schemas: BTreeMap<String, SchemaNode>) -> Self {
        let owners = root_schemas
            .keys()
            .map(|id| (id.clone(), id.clone()))
            .collect();
        Self {
            root_schemas,
            owners,
            ..Self::default()
        }
    }

    /// Fresh acceptor that inherits this one's root registry, owners included.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            root_schemas: self.root_schemas.clone(),
            owners: self.owners.clone(),
            ..Self::default()
        }
    }

    /// Store the schema derived for `name`.
    pub fn accept(&mut self, name: &str, node: SchemaNode) -> Result<()> {
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        self.schemas.insert(name.to_string(), node);
        Ok(())
    }

    #[must_use]
    pub fn has_root(&self, id: &str) -> bool {
        self.root_schemas.contains_key(id)
    }

    /// Declared type that registered `id`.
    #[must_use]
    pub fn root_owner(&self, id: &str) -> Option<&str> {
        self.owners.get(id).map(String::as_str)
    }

    /// Whether `id` is reserved but its definition is still being built.
    #[must_use]
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    /// Claim `id` for `owner` before its members are visited.
    ///
    /// Seeded definitions are accepted for any owner, since their source type is unknown.
    pub fn reserve_root(&mut self, id: &str, owner: &str) -> Result<RootSlot> {
        match self.owners.get(id) {
            Some(existing) if existing == owner || existing == id => Ok(RootSlot::Existing),
            Some(existing) => Err(SchemaError::ConflictingDefinition {
                id: id.to_string(),
                existing: existing.clone(),
                incoming: owner.to_string(),
            }),
            None => {
                log::trace!("reserving root schema `{id}` for `{owner}`");
                self.owners.insert(id.to_string(), owner.to_string());
                self.pending.insert(id.to_string());
                self.root_schemas
                    .insert(id.to_string(), SchemaNode::object());
                Ok(RootSlot::Reserved)
            }
        }
    }

    /// Replace the placeholder for `id` with its finished definition.
    pub fn complete_root(&mut self, id: &str, node: SchemaNode) {
        self.pending.remove(id);
        log::debug!("registered root schema `{id}`");
        self.root_schemas.insert(id.to_string(), node);
    }

    pub(crate) const fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) const fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) const fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    #[must_use]
    pub fn into_parts(self) -> (BTreeMap<String, SchemaNode>, BTreeMap<String, SchemaNode>) {
        (self.schemas, self.root_schemas)
    }
}
