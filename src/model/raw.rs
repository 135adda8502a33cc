//! Raw (serializable) document tree
//!
//! The raw form is the `{blocks: [...], entityMap: {...}}` tree the editor
//! persists. Converting a [`TextModel`] to raw and back is lossless.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ropey::Rope;

use super::{Block, BlockType, Entity, EntityData, EntityKey, EntityRange, Mutability, StyleRange, TextModel};
use crate::error::{DocumentError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: BTreeMap<String, RawEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    pub text: String,
    #[serde(rename = "type", default = "default_block_type")]
    pub block_type: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default)]
    pub data: EntityData,
}

fn default_block_type() -> String {
    BlockType::Unstyled.as_str().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: RawEntityKey,
}

/// Entity range keys are numbers in editor output, but hand-written
/// documents sometimes use strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntityKey {
    Index(u64),
    Name(String),
}

impl From<&RawEntityKey> for EntityKey {
    fn from(raw: &RawEntityKey) -> Self {
        match raw {
            RawEntityKey::Index(i) => EntityKey::from(*i),
            RawEntityKey::Name(name) => EntityKey::new(name.clone()),
        }
    }
}

impl From<&EntityKey> for RawEntityKey {
    fn from(key: &EntityKey) -> Self {
        match key.as_index() {
            Some(i) if i.to_string() == key.as_str() => RawEntityKey::Index(i),
            _ => RawEntityKey::Name(key.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mutability: Mutability,
    #[serde(default)]
    pub data: EntityData,
}

impl TextModel {
    /// Build a model from its raw tree
    pub fn from_raw(raw: RawDocument) -> Result<Self> {
        let blocks = raw
            .blocks
            .into_iter()
            .map(|b| {
                let text = Rope::from_str(&b.text);
                let len = text.len_chars();
                let in_bounds = |offset: usize, length: usize| -> Result<()> {
                    match offset.checked_add(length) {
                        Some(end) if end <= len => Ok(()),
                        _ => Err(DocumentError::RangeOutOfBounds {
                            block: b.key.clone(),
                            offset,
                            length,
                        }),
                    }
                };

                let entity_ranges = b
                    .entity_ranges
                    .iter()
                    .map(|r| {
                        in_bounds(r.offset, r.length)?;
                        Ok(EntityRange {
                            offset: r.offset,
                            length: r.length,
                            key: EntityKey::from(&r.key),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let inline_style_ranges = b
                    .inline_style_ranges
                    .iter()
                    .map(|r| {
                        in_bounds(r.offset, r.length)?;
                        Ok(StyleRange {
                            offset: r.offset,
                            length: r.length,
                            style: r.style.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(Block {
                    block_type: BlockType::from(b.block_type.as_str()),
                    depth: b.depth,
                    entity_ranges,
                    inline_style_ranges,
                    text,
                    key: b.key,
                    data: b.data,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let entities = raw
            .entity_map
            .into_iter()
            .map(|(key, e)| {
                (
                    EntityKey::new(key),
                    Entity::new(e.entity_type, e.mutability, e.data),
                )
            })
            .collect();

        Self::from_parts(blocks, entities)
    }

    /// Convert the model to its raw tree
    pub fn to_raw(&self) -> RawDocument {
        let blocks = self
            .blocks()
            .map(|b| RawBlock {
                key: b.key.clone(),
                text: b.text_string(),
                block_type: b.block_type.as_str().to_string(),
                depth: b.depth,
                inline_style_ranges: b
                    .inline_style_ranges
                    .iter()
                    .map(|r| RawStyleRange {
                        offset: r.offset,
                        length: r.length,
                        style: r.style.clone(),
                    })
                    .collect(),
                entity_ranges: b
                    .entity_ranges
                    .iter()
                    .map(|r| RawEntityRange {
                        offset: r.offset,
                        length: r.length,
                        key: RawEntityKey::from(&r.key),
                    })
                    .collect(),
                data: b.data.clone(),
            })
            .collect();

        let entity_map = self
            .entities()
            .map(|(key, e)| {
                (
                    key.as_str().to_string(),
                    RawEntity {
                        entity_type: e.entity_type.clone(),
                        mutability: e.mutability,
                        data: e.data.clone(),
                    },
                )
            })
            .collect();

        RawDocument { blocks, entity_map }
    }

    /// Parse a model from raw JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Serialize the model to raw JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }

    /// Serialize the model to indented raw JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_raw())?)
    }
}
