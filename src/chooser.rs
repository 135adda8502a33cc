//! Chooser session boundary
//!
//! A chooser is an external, asynchronous picker (page, image, document,
//! embed, link dialogs). The core only sequences it: open with a config
//! seeded from the selected text, then either run the mutation pipeline on
//! the returned payload or do nothing on cancellation.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{DocumentError, Result};
use crate::model::{EntityData, EntityKey, Selection, TextModel};
use crate::mutator::{EntityMutator, MutationOutcome, MutationRequest};
use crate::registry::EntityRegistry;
use crate::selection_text::extract_text;

/// Payload field a chooser sets to ask for its title to replace the selection
pub const PREFER_TITLE_FIELD: &str = "prefer_this_title_as_link_text";

/// Which picker to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChooserTarget {
    Page,
    ExternalLink,
    EmailLink,
    PhoneLink,
    AnchorLink,
    Document,
    Image,
    /// Format/alt-text step for an already chosen image
    ImageFormat,
    Embed,
}

/// Everything the host needs to open a chooser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChooserConfig {
    pub target: ChooserTarget,
    /// Pre-filled search query (the selected text, if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_query: Option<String>,
    pub params: BTreeMap<String, String>,
}

impl ChooserConfig {
    pub fn new(target: ChooserTarget, selected_text: &str) -> Self {
        Self {
            target,
            initial_query: (!selected_text.is_empty()).then(|| selected_text.to_string()),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_optional_param(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_param(name, value),
            None => self,
        }
    }

    /// Parameters shared by all link choosers
    pub(crate) fn with_link_defaults(self, selected_text: &str) -> Self {
        self.with_param("allow_external_link", "true")
            .with_param("allow_email_link", "true")
            .with_param("allow_phone_link", "true")
            .with_param("allow_anchor_link", "true")
            .with_param("link_text", selected_text)
    }
}

/// How a chooser session ended
#[derive(Debug, Clone, PartialEq)]
pub enum ChooserOutcome {
    Chosen {
        payload: EntityData,
        /// Replace the selection with the payload's title instead of wrapping it
        prefer_title_as_text: bool,
    },
    Cancelled,
}

impl ChooserOutcome {
    /// Outcome for a payload, honouring the payload's own title preference flag
    pub fn chosen(payload: EntityData) -> Self {
        let prefer_title_as_text = payload
            .get(PREFER_TITLE_FIELD)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Self::Chosen {
            payload,
            prefer_title_as_text,
        }
    }
}

/// The host side of a chooser: shows and hides the picker UI.
///
/// Results come back later as a [`ChooserOutcome`] passed to
/// [`ChooserWorkflow::resolve`].
pub trait ChooserSession {
    fn open(&mut self, config: &ChooserConfig);

    /// Called once the chosen payload has been woven into the document
    fn close(&mut self);
}

/// A chooser that was opened and has not resolved yet
#[derive(Debug, Clone, PartialEq)]
struct PendingChooser {
    entity_type: String,
    selection: Selection,
    existing: Option<EntityKey>,
}

/// Sequences a single chooser invocation: at most one is pending at a time.
#[derive(Debug, Default)]
pub struct ChooserWorkflow {
    pending: Option<PendingChooser>,
}

impl ChooserWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Open a chooser for `entity_type` over `selection`.
    ///
    /// `existing` names the entity being edited (for example the atomic
    /// block's image, or the link under the caret).
    pub fn begin(
        &mut self,
        session: &mut dyn ChooserSession,
        registry: &EntityRegistry,
        model: &TextModel,
        selection: &Selection,
        entity_type: &str,
        existing: Option<EntityKey>,
    ) -> Result<ChooserConfig> {
        if self.pending.is_some() {
            tracing::warn!(entity_type, "chooser requested while another is open");
            return Err(DocumentError::ChooserBusy);
        }

        let descriptor = registry.require(entity_type)?;
        let existing_entity = match &existing {
            Some(key) => Some(model.entity(key)?),
            None => None,
        };
        let selected_text = extract_text(model, selection)?;
        let config = descriptor
            .source
            .chooser_config(existing_entity, &selected_text);

        tracing::debug!(entity_type, target = ?config.target, "opening chooser");
        session.open(&config);
        self.pending = Some(PendingChooser {
            entity_type: entity_type.to_string(),
            selection: selection.clone(),
            existing,
        });
        Ok(config)
    }

    /// Finish the pending chooser.
    ///
    /// Cancellation performs no mutation. A chosen payload runs the entity
    /// mutation pipeline against `model`. The session is closed whether or not
    /// the mutation succeeds.
    pub fn resolve(
        &mut self,
        session: &mut dyn ChooserSession,
        registry: &EntityRegistry,
        model: &TextModel,
        outcome: ChooserOutcome,
    ) -> Result<Option<MutationOutcome>> {
        let Some(pending) = self.pending.take() else {
            tracing::warn!("chooser resolved with nothing pending");
            return Ok(None);
        };

        let (payload, prefer_title_as_text) = match outcome {
            ChooserOutcome::Cancelled => {
                tracing::debug!(entity_type = %pending.entity_type, "chooser cancelled");
                return Ok(None);
            }
            ChooserOutcome::Chosen {
                payload,
                prefer_title_as_text,
            } => (payload, prefer_title_as_text),
        };

        let result = Self::mutate(registry, model, pending, &payload, prefer_title_as_text);
        // The host dialog is finished either way
        session.close();
        result.map(Some)
    }

    fn mutate(
        registry: &EntityRegistry,
        model: &TextModel,
        pending: PendingChooser,
        payload: &EntityData,
        prefer_payload_title_as_text: bool,
    ) -> Result<MutationOutcome> {
        let descriptor = registry.require(&pending.entity_type)?;
        let existing = match pending.existing {
            Some(key) => {
                let entity = model.entity(&key)?.clone();
                Some((key, entity))
            }
            None => None,
        };

        EntityMutator::apply(MutationRequest {
            model,
            selection: &pending.selection,
            descriptor,
            existing,
            payload,
            prefer_payload_title_as_text,
        })
    }
}
