//! Message types for the Elm-style architecture
//!
//! All state changes of an [`EditorSession`](crate::session::EditorSession)
//! flow through these message types.

use crate::chooser::ChooserOutcome;
use crate::model::{EntityKey, Selection};

/// Editor messages (selection, choosers, clipboard, history)
#[derive(Debug, Clone)]
pub enum EditorMsg {
    // === Selection ===
    /// Replace the current selection
    SetSelection(Selection),

    // === Choosers ===
    /// Open the chooser for an entity type over the current selection
    OpenChooser {
        entity_type: String,
        /// Entity being edited, if any
        existing: Option<EntityKey>,
    },
    /// The open chooser returned
    ChooserResolved(ChooserOutcome),
    /// The open chooser was dismissed
    ChooserCancelled,

    // === Clipboard ===
    /// Text pasted at the current selection
    Paste(String),

    // === History ===
    Undo,
    Redo,
}
