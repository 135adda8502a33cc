//! One editing session: document, selection, and everything bound to them
//!
//! The session owns the current [`TextModel`] snapshot, the entity registry
//! it was configured with, undo history and the chooser workflow. Messages
//! are applied through [`update`](crate::update::update).

use crate::chooser::{ChooserSession, ChooserWorkflow};
use crate::config::EditorConfig;
use crate::history::{History, Snapshot};
use crate::length::{LengthLimit, LengthStatus};
use crate::model::{Selection, TextModel};
use crate::registry::EntityRegistry;

pub struct EditorSession {
    pub model: TextModel,
    pub selection: Selection,
    pub registry: EntityRegistry,
    pub config: EditorConfig,
    pub history: History,
    pub chooser: ChooserWorkflow,
    pub(crate) host: Box<dyn ChooserSession>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("model", &self.model)
            .field("selection", &self.selection)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("history", &self.history)
            .field("chooser", &self.chooser)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Start a session on `model` with the caret at the start of its first block
    pub fn new(model: TextModel, config: EditorConfig, host: Box<dyn ChooserSession>) -> Self {
        let selection = model
            .first_block()
            .map(|b| Selection::collapsed(b.key.clone(), 0))
            .unwrap_or_else(|| Selection::collapsed(String::new(), 0));
        Self {
            registry: config.registry(),
            history: History::with_max_size(config.history_size),
            chooser: ChooserWorkflow::new(),
            model,
            selection,
            config,
            host,
        }
    }

    pub fn length_limit(&self) -> LengthLimit {
        self.config.length_limit()
    }

    pub fn length_status(&self) -> LengthStatus {
        self.length_limit().measure(&self.model)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.model.clone(), self.selection.clone())
    }

    /// Install a new document state, recording the current one for undo
    pub fn commit(&mut self, model: TextModel, selection: Selection) {
        let before = self.snapshot();
        self.history.push(before);
        self.model = model;
        self.selection = selection;
    }

    /// Replace the current state without touching history
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.model = snapshot.model;
        self.selection = snapshot.selection;
    }
}
