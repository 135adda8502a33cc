//! Pasting links
//!
//! Pasted text that validates as a link becomes a LINK entity: at a caret
//! the link text is inserted, over a selection the selection is wrapped.
//! Anything else is left to the caller to insert as plain text.

use crate::error::Result;
use crate::links::validate;
use crate::model::{types, EntityData, Selection, TextModel};
use crate::mutator::{EntityMutator, MutationOutcome, MutationRequest};
use crate::registry::EntityRegistry;

/// What happened to a paste
#[derive(Debug, Clone)]
pub enum PasteOutcome {
    /// The paste became a link
    Handled(MutationOutcome),
    /// Not a link; insert as plain text
    NotHandled,
}

impl PasteOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, PasteOutcome::Handled(_))
    }
}

/// Interpret `text` as a link paste over `selection`.
///
/// Returns `NotHandled` when the text is not a valid link or when the
/// registry has no LINK type.
pub fn handle_paste<S: AsRef<str>>(
    model: &TextModel,
    selection: &Selection,
    text: &str,
    registry: &EntityRegistry,
    schemes: &[S],
) -> Result<PasteOutcome> {
    let Some(descriptor) = registry.get(types::LINK) else {
        return Ok(PasteOutcome::NotHandled);
    };
    let Some(url) = validate(text.trim(), schemes) else {
        return Ok(PasteOutcome::NotHandled);
    };

    let mut payload = EntityData::new();
    payload.insert("url".to_string(), url.into());

    let outcome = EntityMutator::apply(MutationRequest {
        model,
        selection,
        descriptor,
        existing: None,
        payload: &payload,
        prefer_payload_title_as_text: false,
    })?;
    tracing::debug!(entity = %outcome.entity_key, "pasted link");
    Ok(PasteOutcome::Handled(outcome))
}
