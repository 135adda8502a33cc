//! Entities - typed, keyed references to external data (links, media)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque entity payload as persisted on the entity
pub type EntityData = serde_json::Map<String, serde_json::Value>;

/// Well-known entity type tags
pub mod types {
    pub const LINK: &str = "LINK";
    pub const DOCUMENT: &str = "DOCUMENT";
    pub const IMAGE: &str = "IMAGE";
    pub const EMBED: &str = "EMBED";
}

/// Whether an entity's data can be replaced in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    /// Data may be replaced while keeping the same key
    Mutable,
    /// Must be superseded by a brand-new entity key
    Immutable,
}

impl Mutability {
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Type -> mutability. Types not listed here are treated as mutable.
const MUTABILITY_TABLE: &[(&str, Mutability)] = &[
    (types::LINK, Mutability::Mutable),
    (types::DOCUMENT, Mutability::Mutable),
    (types::IMAGE, Mutability::Immutable),
    (types::EMBED, Mutability::Immutable),
];

/// Look up the mutability policy for an entity type
pub fn mutability_for(entity_type: &str) -> Mutability {
    MUTABILITY_TABLE
        .iter()
        .find(|(name, _)| *name == entity_type)
        .map(|(_, mutability)| *mutability)
        .unwrap_or(Mutability::Mutable)
}

/// Key of an entity within a document's entity table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the key, if it was generated by a model counter
    pub(crate) fn as_index(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<u64> for EntityKey {
    fn from(index: u64) -> Self {
        Self(index.to_string())
    }
}

/// A typed entity with its persisted data
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub entity_type: String,
    pub mutability: Mutability,
    pub data: EntityData,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>, mutability: Mutability, data: EntityData) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability,
            data,
        }
    }

    /// Create an entity using the mutability table for its type
    pub fn of_type(entity_type: &str, data: EntityData) -> Self {
        Self::new(entity_type, mutability_for(entity_type), data)
    }

    /// String value of a data field, if present and a string
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}
