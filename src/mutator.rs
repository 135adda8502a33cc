//! Chooser-driven entity mutation
//!
//! Combines the current selection, an entity type descriptor and a chooser
//! payload into a new document. Rules, first match wins:
//!
//! | existing entity | block-level | action                                        |
//! |-----------------|-------------|-----------------------------------------------|
//! | yes             | yes         | replace data in place (mutable) or supersede   |
//! | no              | yes         | new entity in a new atomic block               |
//! | any             | no          | new entity; insert title text or wrap selection|

use serde_json::Value;

use crate::error::{DocumentError, Result};
use crate::model::{
    mutability_for, Entity, EntityData, EntityKey, Selection, TextModel, ATOMIC_PLACEHOLDER,
};
use crate::registry::EntityTypeDescriptor;

/// Inputs of one mutation
#[derive(Debug, Clone)]
pub struct MutationRequest<'a> {
    pub model: &'a TextModel,
    pub selection: &'a Selection,
    pub descriptor: &'a EntityTypeDescriptor,
    /// Entity being edited, with its key
    pub existing: Option<(EntityKey, Entity)>,
    /// Raw chooser payload (projected through the descriptor before storing)
    pub payload: &'a EntityData,
    pub prefer_payload_title_as_text: bool,
}

/// What the mutation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationAction {
    /// Mutable entity updated under the same key
    ReplacedData,
    /// Immutable entity replaced by a new key; the atomic block was retargeted
    Superseded { previous: EntityKey },
    /// New atomic block inserted
    InsertedBlock,
    /// New text inserted, tagged with the entity
    InsertedText,
    /// Existing selected text tagged with the entity
    Wrapped,
}

/// Result of a mutation: the next snapshot plus where the caret goes
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub model: TextModel,
    pub selection: Selection,
    pub entity_key: EntityKey,
    pub action: MutationAction,
}

pub struct EntityMutator;

impl EntityMutator {
    /// Run the mutation pipeline
    pub fn apply(request: MutationRequest<'_>) -> Result<MutationOutcome> {
        let MutationRequest {
            model,
            selection,
            descriptor,
            existing,
            payload,
            prefer_payload_title_as_text,
        } = request;
        let data = descriptor.filter_payload(payload);

        let outcome = match (existing, descriptor.is_block_level) {
            (Some((key, entity)), true) => {
                Self::update_block_entity(model, selection, descriptor, key, &entity, data)?
            }
            (None, true) => Self::insert_block_entity(model, selection, descriptor, data)?,
            (_, false) => Self::insert_inline_entity(
                model,
                selection,
                descriptor,
                payload,
                data,
                prefer_payload_title_as_text,
            )?,
        };

        tracing::debug!(
            entity_type = %descriptor.entity_type,
            entity = %outcome.entity_key,
            action = ?outcome.action,
            "entity mutation applied"
        );
        Ok(outcome)
    }

    fn update_block_entity(
        model: &TextModel,
        selection: &Selection,
        descriptor: &EntityTypeDescriptor,
        key: EntityKey,
        entity: &Entity,
        data: EntityData,
    ) -> Result<MutationOutcome> {
        if descriptor.mutability().is_mutable() && entity.mutability.is_mutable() {
            let next = model.replace_entity_data(&key, data)?;
            return Ok(MutationOutcome {
                model: next,
                selection: selection.clone(),
                entity_key: key,
                action: MutationAction::ReplacedData,
            });
        }

        let block_key = Self::block_holding(model, selection, &key)?;
        let (next, new_key) =
            model.create_entity(&descriptor.entity_type, mutability_for(&descriptor.entity_type), data);
        let next = next.set_block_entity(&block_key, &new_key)?;

        Ok(MutationOutcome {
            model: next,
            selection: selection.clone(),
            entity_key: new_key,
            action: MutationAction::Superseded { previous: key },
        })
    }

    /// The atomic block referencing `entity`: the selection's block if it
    /// does, otherwise the first one in document order.
    fn block_holding(model: &TextModel, selection: &Selection, entity: &EntityKey) -> Result<String> {
        if let Ok(block) = model.block(&selection.anchor_key) {
            if block.references(entity) {
                return Ok(block.key.clone());
            }
        }
        model
            .blocks()
            .find(|b| b.is_atomic() && b.references(entity))
            .map(|b| b.key.clone())
            .ok_or_else(|| {
                DocumentError::InvalidMutation(format!("no atomic block references entity {entity}"))
            })
    }

    fn insert_block_entity(
        model: &TextModel,
        selection: &Selection,
        descriptor: &EntityTypeDescriptor,
        data: EntityData,
    ) -> Result<MutationOutcome> {
        // Selected text is removed first, leaving a caret to split at
        let (base, caret) = if selection.is_collapsed() {
            (model.clone(), selection.clone())
        } else {
            model.replace_text_range(selection, "", None)?
        };

        let (next, key) =
            base.create_entity(&descriptor.entity_type, mutability_for(&descriptor.entity_type), data);
        let (next, after) = next.insert_atomic_block(&caret, &key, ATOMIC_PLACEHOLDER)?;

        Ok(MutationOutcome {
            model: next,
            selection: after,
            entity_key: key,
            action: MutationAction::InsertedBlock,
        })
    }

    fn insert_inline_entity(
        model: &TextModel,
        selection: &Selection,
        descriptor: &EntityTypeDescriptor,
        payload: &EntityData,
        data: EntityData,
        prefer_title: bool,
    ) -> Result<MutationOutcome> {
        let text = replacement_text(payload, &data);
        let (next, key) =
            model.create_entity(&descriptor.entity_type, mutability_for(&descriptor.entity_type), data);

        if selection.is_collapsed() || prefer_title {
            let (next, caret) = next.replace_text_range(selection, &text, Some(&key))?;
            Ok(MutationOutcome {
                model: next,
                selection: caret,
                entity_key: key,
                action: MutationAction::InsertedText,
            })
        } else {
            let next = next.apply_entity(selection, Some(&key))?;
            Ok(MutationOutcome {
                model: next,
                selection: selection.clone(),
                entity_key: key,
                action: MutationAction::Wrapped,
            })
        }
    }
}

/// Text to insert for an inline entity: the payload title, else its url,
/// else the url kept on the entity.
fn replacement_text(payload: &EntityData, data: &EntityData) -> String {
    let non_empty = |map: &EntityData, field: &str| {
        map.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    non_empty(payload, "title")
        .or_else(|| non_empty(payload, "url"))
        .or_else(|| non_empty(data, "url"))
        .unwrap_or_default()
}
