//! Entity type registry
//!
//! Each editor session owns its own registry of the entity types it can
//! create, so independent editors never share configuration.

mod source;

use std::collections::HashMap;

use crate::error::{DocumentError, Result};
use crate::model::{mutability_for, types, EntityData, Mutability};

pub use source::ChooserSource;

/// Configuration of one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTypeDescriptor {
    pub entity_type: String,
    /// Rendered as its own atomic block rather than an inline span
    pub is_block_level: bool,
    pub source: ChooserSource,
}

impl EntityTypeDescriptor {
    pub fn new(entity_type: &str, is_block_level: bool, source: ChooserSource) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            is_block_level,
            source,
        }
    }

    pub fn mutability(&self) -> Mutability {
        mutability_for(&self.entity_type)
    }

    /// Project a raw chooser payload to the entity's persisted data
    pub fn filter_payload(&self, raw: &EntityData) -> EntityData {
        self.source.filter_payload(raw)
    }
}

/// Entity types known to an editor session
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, EntityTypeDescriptor>,
}

impl EntityRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// LINK and DOCUMENT inline, IMAGE and EMBED as blocks
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(EntityTypeDescriptor::new(types::LINK, false, ChooserSource::Link));
        registry.register(EntityTypeDescriptor::new(types::DOCUMENT, false, ChooserSource::Document));
        registry.register(EntityTypeDescriptor::new(types::IMAGE, true, ChooserSource::Image));
        registry.register(EntityTypeDescriptor::new(types::EMBED, true, ChooserSource::Embed));
        registry
    }

    /// Add or replace a descriptor
    pub fn register(&mut self, descriptor: EntityTypeDescriptor) {
        tracing::trace!(entity_type = %descriptor.entity_type, "registered entity type");
        self.descriptors
            .insert(descriptor.entity_type.clone(), descriptor);
    }

    /// Keep only the listed entity types
    pub fn restricted_to<S: AsRef<str>>(mut self, enabled: &[S]) -> Self {
        self.descriptors
            .retain(|name, _| enabled.iter().any(|e| e.as_ref() == name));
        self
    }

    pub fn get(&self, entity_type: &str) -> Option<&EntityTypeDescriptor> {
        self.descriptors.get(entity_type)
    }

    /// Like [`get`](Self::get), failing with `UnknownEntityType`
    pub fn require(&self, entity_type: &str) -> Result<&EntityTypeDescriptor> {
        self.get(entity_type)
            .ok_or_else(|| DocumentError::UnknownEntityType(entity_type.to_string()))
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.descriptors.contains_key(entity_type)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
