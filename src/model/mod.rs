//! Document model - immutable block-structured rich text
//!
//! Every operation on [`TextModel`] returns a new model. Blocks and entities
//! are held behind `Arc`, and block text is a `ropey::Rope`, so the previous
//! and next snapshots share everything an edit did not touch.

mod block;
mod entity;
pub mod raw;
mod selection;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use ropey::Rope;

use crate::error::{DocumentError, Result};

pub use block::{Annotation, Block, BlockType, EntityRange, StyleRange};
pub use entity::{mutability_for, types, Entity, EntityData, EntityKey, Mutability};
pub use selection::{Selection, SelectionPoint};

use block::{clip_after, clip_before, splice};

/// Placeholder text carried by atomic blocks
pub const ATOMIC_PLACEHOLDER: &str = " ";

/// A selection resolved against a model: block indices plus clamped offsets,
/// always in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_index: usize,
    pub start_offset: usize,
    pub end_index: usize,
    pub end_offset: usize,
}

impl Span {
    pub fn is_collapsed(&self) -> bool {
        self.start_index == self.end_index && self.start_offset == self.end_offset
    }

    pub fn is_single_block(&self) -> bool {
        self.start_index == self.end_index
    }
}

/// Immutable rich-text document: ordered blocks plus an entity table
#[derive(Debug, Clone, Default)]
pub struct TextModel {
    blocks: Vec<Arc<Block>>,
    entity_map: BTreeMap<EntityKey, Arc<Entity>>,
    /// Counter for generated entity keys (not part of equality)
    next_entity_key: u64,
}

impl PartialEq for TextModel {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks && self.entity_map == other.entity_map
    }
}

impl TextModel {
    /// Create a document from blocks, with an empty entity table
    pub fn new(blocks: Vec<Block>) -> Result<Self> {
        Self::from_parts(blocks, BTreeMap::new())
    }

    /// Create a document containing a single empty paragraph
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            blocks: vec![Arc::new(Block::new(key, ""))],
            ..Self::default()
        }
    }

    /// Create a document from blocks and an entity table.
    ///
    /// Fails with `DuplicateBlockKey` if two blocks share a key.
    pub fn from_parts(blocks: Vec<Block>, entities: BTreeMap<EntityKey, Entity>) -> Result<Self> {
        let mut seen = HashSet::new();
        for block in &blocks {
            if !seen.insert(block.key.as_str()) {
                return Err(DocumentError::DuplicateBlockKey(block.key.clone()));
            }
        }

        let next_entity_key = entities
            .keys()
            .filter_map(EntityKey::as_index)
            .max()
            .map_or(0, |max| max.wrapping_add(1));

        Ok(Self {
            blocks: blocks.into_iter().map(Arc::new).collect(),
            entity_map: entities
                .into_iter()
                .map(|(key, entity)| (key, Arc::new(entity)))
                .collect(),
            next_entity_key,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|b| b.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index).map(|b| b.as_ref())
    }

    pub fn first_block(&self) -> Option<&Block> {
        self.block_at(0)
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last().map(|b| b.as_ref())
    }

    /// Look up a block by key
    pub fn block(&self, key: &str) -> Result<&Block> {
        self.index_of(key).map(|idx| self.blocks[idx].as_ref())
    }

    /// Position of a block in document order
    pub fn index_of(&self, key: &str) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| b.key == key)
            .ok_or_else(|| DocumentError::BlockNotFound(key.to_string()))
    }

    /// Look up an entity by key
    pub fn entity(&self, key: &EntityKey) -> Result<&Entity> {
        self.entity_map
            .get(key)
            .map(|e| e.as_ref())
            .ok_or_else(|| DocumentError::EntityNotFound(key.clone()))
    }

    pub fn entities(&self) -> impl Iterator<Item = (&EntityKey, &Entity)> {
        self.entity_map.iter().map(|(k, e)| (k, e.as_ref()))
    }

    pub fn entity_count(&self) -> usize {
        self.entity_map.len()
    }

    /// Entity covering `offset` in the given block
    pub fn entity_at(&self, block_key: &str, offset: usize) -> Result<Option<&EntityKey>> {
        Ok(self.block(block_key)?.entity_at(offset))
    }

    /// Whether any block references the entity
    pub fn is_referenced(&self, key: &EntityKey) -> bool {
        self.blocks.iter().any(|b| b.references(key))
    }

    /// Block texts joined with newlines
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolve a selection against this model.
    ///
    /// The backward flag decides which end is the start; offsets past the end
    /// of a block are clamped to its length.
    pub fn span(&self, selection: &Selection) -> Result<Span> {
        let start = selection.start();
        let end = selection.end();

        let start_index = self.index_of(&start.key)?;
        let end_index = self.index_of(&end.key)?;
        let start_offset = start.offset.min(self.blocks[start_index].len_chars());
        let end_offset = end.offset.min(self.blocks[end_index].len_chars());

        let span = if (start_index, start_offset) <= (end_index, end_offset) {
            Span {
                start_index,
                start_offset,
                end_index,
                end_offset,
            }
        } else {
            tracing::debug!(
                anchor = %selection.anchor_key,
                focus = %selection.focus_key,
                "selection direction disagrees with document order, swapping"
            );
            Span {
                start_index: end_index,
                start_offset: end_offset,
                end_index: start_index,
                end_offset: start_offset,
            }
        };
        Ok(span)
    }

    // =========================================================================
    // Entity operations
    // =========================================================================

    /// Add a new entity under a freshly generated key.
    ///
    /// Existing entities are never touched.
    pub fn create_entity(
        &self,
        entity_type: &str,
        mutability: Mutability,
        data: EntityData,
    ) -> (Self, EntityKey) {
        let mut next = self.clone();
        // The counter wraps; the map is finite so a free key always exists
        let mut key = EntityKey::from(next.next_entity_key);
        while next.entity_map.contains_key(&key) {
            next.next_entity_key = next.next_entity_key.wrapping_add(1);
            key = EntityKey::from(next.next_entity_key);
        }
        next.next_entity_key = next.next_entity_key.wrapping_add(1);

        tracing::debug!(%key, entity_type, ?mutability, "created entity");
        next.entity_map.insert(
            key.clone(),
            Arc::new(Entity::new(entity_type, mutability, data)),
        );
        (next, key)
    }

    /// Replace the data of a mutable entity, keeping its key.
    pub fn replace_entity_data(&self, key: &EntityKey, data: EntityData) -> Result<Self> {
        let entity = self.entity(key)?;
        if !entity.mutability.is_mutable() {
            tracing::warn!(%key, entity_type = %entity.entity_type, "refusing to mutate immutable entity");
            return Err(DocumentError::InvalidMutation(format!(
                "entity {} of type {} is immutable",
                key, entity.entity_type
            )));
        }

        let replaced = Entity {
            data,
            ..entity.clone()
        };
        let mut next = self.clone();
        next.entity_map.insert(key.clone(), Arc::new(replaced));
        tracing::debug!(%key, "replaced entity data");
        Ok(next)
    }

    /// Drop entities that no block references
    pub fn prune_entities(&self) -> Self {
        let referenced: HashSet<&EntityKey> = self
            .blocks
            .iter()
            .flat_map(|b| b.entity_ranges.iter().map(|r| &r.key))
            .collect();

        let mut next = self.clone();
        next.entity_map
            .retain(|key, _| referenced.contains(key));
        next
    }

    // =========================================================================
    // Text operations
    // =========================================================================

    /// Replace the selected text with `text`.
    ///
    /// When `entity` is given the inserted text is tagged with it. A selection
    /// spanning several blocks merges the first and last block into one; the
    /// blocks in between are dropped. Returns the new model and a caret placed
    /// after the inserted text.
    pub fn replace_text_range(
        &self,
        selection: &Selection,
        text: &str,
        entity: Option<&EntityKey>,
    ) -> Result<(Self, Selection)> {
        if let Some(key) = entity {
            self.entity(key)?;
        }
        let span = self.span(selection)?;
        let first = &self.blocks[span.start_index];
        let last = &self.blocks[span.end_index];
        let inserted = text.chars().count();

        // Atomic placeholders are never edited, merged or partially kept
        let empty_span =
            (span.start_index, span.start_offset) == (span.end_index, span.end_offset);
        let keeps_last_tail =
            span.start_index != span.end_index && span.end_offset < last.len_chars();
        let atomic_edited = if first.is_atomic() && (inserted > 0 || !empty_span) {
            Some(first)
        } else if last.is_atomic() && keeps_last_tail {
            Some(last)
        } else {
            None
        };
        if let Some(block) = atomic_edited {
            return Err(DocumentError::InvalidMutation(format!(
                "cannot edit the text of atomic block {}",
                block.key
            )));
        }

        let mut rope = first.text.clone();
        rope.remove(span.start_offset..);
        rope.insert(span.start_offset, text);
        rope.append(Rope::from(last.text.slice(span.end_offset..)));

        let mut entity_ranges = clip_before(&first.entity_ranges, span.start_offset);
        if let Some(key) = entity {
            if inserted > 0 {
                entity_ranges.push(EntityRange {
                    offset: span.start_offset,
                    length: inserted,
                    key: key.clone(),
                });
            }
        }
        entity_ranges.extend(clip_after(
            &last.entity_ranges,
            span.end_offset,
            span.start_offset + inserted,
        ));
        entity_ranges.sort_by_key(|r| r.offset);

        let mut inline_style_ranges = clip_before(&first.inline_style_ranges, span.start_offset);
        inline_style_ranges.extend(clip_after(
            &last.inline_style_ranges,
            span.end_offset,
            span.start_offset + inserted,
        ));

        let merged = Block {
            text: rope,
            entity_ranges,
            inline_style_ranges,
            ..first.as_ref().clone()
        };

        let mut next = self.clone();
        next.blocks
            .splice(span.start_index..=span.end_index, [Arc::new(merged)]);

        tracing::debug!(
            block = %first.key,
            merged_blocks = span.end_index - span.start_index + 1,
            inserted,
            "replaced text range"
        );
        let caret = Selection::collapsed(first.key.clone(), span.start_offset + inserted);
        Ok((next, caret))
    }

    /// Tag the selected text with `entity` (or clear entities when `None`)
    /// without changing any text.
    pub fn apply_entity(&self, selection: &Selection, entity: Option<&EntityKey>) -> Result<Self> {
        if let Some(key) = entity {
            self.entity(key)?;
        }
        let span = self.span(selection)?;
        let mut next = self.clone();

        for index in span.start_index..=span.end_index {
            let block = &self.blocks[index];
            if block.is_atomic() {
                continue;
            }
            let start = if index == span.start_index {
                span.start_offset
            } else {
                0
            };
            let end = if index == span.end_index {
                span.end_offset
            } else {
                block.len_chars()
            };
            if start >= end {
                continue;
            }

            let mut ranges = splice(&block.entity_ranges, start, end, end - start);
            if let Some(key) = entity {
                ranges.push(EntityRange {
                    offset: start,
                    length: end - start,
                    key: key.clone(),
                });
            }
            ranges.sort_by_key(|r| r.offset);

            next.blocks[index] = Arc::new(Block {
                entity_ranges: ranges,
                ..block.as_ref().clone()
            });
        }

        tracing::debug!(entity = ?entity.map(EntityKey::as_str), "applied entity to selection");
        Ok(next)
    }

    /// Split the block at a collapsed selection and insert an atomic block
    /// carrying `entity` between the two halves.
    ///
    /// A caret inside an atomic block never splits it: the new block goes
    /// before it at offset 0 and after it otherwise. Returns the new model
    /// and a caret at the start of the block following the new atomic block.
    pub fn insert_atomic_block(
        &self,
        selection: &Selection,
        entity: &EntityKey,
        placeholder: &str,
    ) -> Result<(Self, Selection)> {
        if !selection.is_collapsed() {
            return Err(DocumentError::InvalidMutation(
                "atomic blocks can only be inserted at a collapsed selection".to_string(),
            ));
        }
        self.entity(entity)?;

        let span = self.span(selection)?;
        let block = &self.blocks[span.start_index];
        if block.is_atomic() {
            let offset = span.start_offset;
            return Ok(self.insert_beside_atomic(span.start_index, offset, entity, placeholder));
        }
        let offset = span.start_offset;

        let mut head_text = block.text.clone();
        let tail_text = head_text.split_off(offset);

        let keys = self.fresh_block_keys(2);
        let (atomic_key, tail_key) = (keys[0].clone(), keys[1].clone());

        let head = Block {
            text: head_text,
            entity_ranges: clip_before(&block.entity_ranges, offset),
            inline_style_ranges: clip_before(&block.inline_style_ranges, offset),
            ..block.as_ref().clone()
        };
        let atomic = Block::atomic(atomic_key.clone(), placeholder, entity.clone());
        let tail = Block {
            key: tail_key.clone(),
            text: tail_text,
            block_type: block.block_type.clone(),
            depth: block.depth,
            entity_ranges: clip_after(&block.entity_ranges, offset, 0),
            inline_style_ranges: clip_after(&block.inline_style_ranges, offset, 0),
            data: EntityData::new(),
        };

        let mut next = self.clone();
        next.blocks.splice(
            span.start_index..=span.start_index,
            [Arc::new(head), Arc::new(atomic), Arc::new(tail)],
        );

        tracing::debug!(%entity, block = %atomic_key, after = %block.key, "inserted atomic block");
        Ok((next, Selection::collapsed(tail_key, 0)))
    }

    /// Place a new atomic block next to the atomic block at `index`, leaving
    /// that block untouched. An empty paragraph is appended when nothing
    /// follows, so the caret always lands in editable text or another block.
    fn insert_beside_atomic(
        &self,
        index: usize,
        offset: usize,
        entity: &EntityKey,
        placeholder: &str,
    ) -> (Self, Selection) {
        let keys = self.fresh_block_keys(2);
        let (atomic_key, tail_key) = (keys[0].clone(), keys[1].clone());
        let atomic = Arc::new(Block::atomic(atomic_key.clone(), placeholder, entity.clone()));

        let mut next = self.clone();
        let caret_key = if offset == 0 {
            next.blocks.insert(index, atomic);
            self.blocks[index].key.clone()
        } else {
            next.blocks.insert(index + 1, atomic);
            match self.blocks.get(index + 1) {
                Some(following) => following.key.clone(),
                None => {
                    next.blocks.push(Arc::new(Block::new(tail_key.clone(), "")));
                    tail_key
                }
            }
        };

        tracing::debug!(
            %entity,
            block = %atomic_key,
            beside = %self.blocks[index].key,
            "inserted atomic block beside atomic block"
        );
        (next, Selection::collapsed(caret_key, 0))
    }

    /// Point an atomic block at a different entity
    pub fn set_block_entity(&self, block_key: &str, entity: &EntityKey) -> Result<Self> {
        self.entity(entity)?;
        let index = self.index_of(block_key)?;
        let block = &self.blocks[index];

        let retargeted = Block {
            entity_ranges: vec![EntityRange {
                offset: 0,
                length: block.len_chars(),
                key: entity.clone(),
            }],
            ..block.as_ref().clone()
        };

        let mut next = self.clone();
        next.blocks[index] = Arc::new(retargeted);
        tracing::debug!(block = block_key, %entity, "retargeted block entity");
        Ok(next)
    }

    /// Generate `count` block keys not used by this document
    fn fresh_block_keys(&self, count: usize) -> Vec<String> {
        let taken: HashSet<&str> = self.blocks.iter().map(|b| b.key.as_str()).collect();
        let mut keys = Vec::with_capacity(count);
        let mut n = self.blocks.len();
        while keys.len() < count {
            let candidate = format!("blk{n}");
            if !taken.contains(candidate.as_str()) {
                keys.push(candidate);
            }
            n += 1;
        }
        keys
    }
}
