//! Update functions for the Elm-style architecture
//!
//! All state transformations of an [`EditorSession`] flow through [`update`].

use crate::chooser::ChooserOutcome;
use crate::commands::Cmd;
use crate::error::DocumentError;
use crate::messages::EditorMsg;
use crate::model::{EntityKey, Selection};
use crate::mutator::MutationOutcome;
use crate::paste::{handle_paste, PasteOutcome};
use crate::session::EditorSession;

/// Main update function - dispatches to handlers
pub fn update(session: &mut EditorSession, msg: EditorMsg) -> Option<Cmd> {
    let result = match msg {
        EditorMsg::SetSelection(selection) => set_selection(session, selection),
        EditorMsg::OpenChooser {
            entity_type,
            existing,
        } => open_chooser(session, &entity_type, existing),
        EditorMsg::ChooserResolved(outcome) => resolve_chooser(session, outcome),
        EditorMsg::ChooserCancelled => resolve_chooser(session, ChooserOutcome::Cancelled),
        EditorMsg::Paste(text) => paste(session, &text),
        EditorMsg::Undo => undo(session),
        EditorMsg::Redo => redo(session),
    };

    match result {
        Ok(cmd) => cmd,
        Err(err) => {
            tracing::warn!(error = %err, "editor operation rejected");
            Some(Cmd::ShowError(err.to_string()))
        }
    }
}

type UpdateResult = Result<Option<Cmd>, DocumentError>;

fn set_selection(session: &mut EditorSession, selection: Selection) -> UpdateResult {
    // Reject selections that point outside the document
    session.model.span(&selection)?;
    session.selection = selection;
    Ok(Some(Cmd::Redraw))
}

fn open_chooser(
    session: &mut EditorSession,
    entity_type: &str,
    existing: Option<EntityKey>,
) -> UpdateResult {
    let EditorSession {
        model,
        selection,
        registry,
        chooser,
        host,
        ..
    } = &mut *session;
    let config = chooser.begin(
        host.as_mut(),
        registry,
        model,
        selection,
        entity_type,
        existing,
    )?;
    Ok(Some(Cmd::OpenChooser(config)))
}

fn resolve_chooser(session: &mut EditorSession, outcome: ChooserOutcome) -> UpdateResult {
    let EditorSession {
        model,
        registry,
        chooser,
        host,
        ..
    } = &mut *session;
    match chooser.resolve(host.as_mut(), registry, model, outcome)? {
        Some(outcome) => Ok(Some(apply_mutation(session, outcome))),
        None => Ok(None),
    }
}

fn paste(session: &mut EditorSession, text: &str) -> UpdateResult {
    let outcome = handle_paste(
        &session.model,
        &session.selection,
        text,
        &session.registry,
        &session.config.link_schemes,
    )?;
    match outcome {
        PasteOutcome::Handled(outcome) => Ok(Some(apply_mutation(session, outcome))),
        PasteOutcome::NotHandled => {
            let limit = session.length_limit();
            let current = session.length_status().count;
            if limit.would_exceed(current, text.chars().count()) {
                tracing::debug!(current, max = ?limit.max, "paste goes over the length limit");
            }
            let (model, selection) =
                session
                    .model
                    .replace_text_range(&session.selection, text, None)?;
            session.commit(model, selection);
            Ok(Some(changed(session)))
        }
    }
}

fn undo(session: &mut EditorSession) -> UpdateResult {
    let current = session.snapshot();
    match session.history.undo(current) {
        Some(previous) => {
            session.restore(previous);
            Ok(Some(changed(session)))
        }
        None => Ok(None),
    }
}

fn redo(session: &mut EditorSession) -> UpdateResult {
    let current = session.snapshot();
    match session.history.redo(current) {
        Some(next) => {
            session.restore(next);
            Ok(Some(changed(session)))
        }
        None => Ok(None),
    }
}

fn apply_mutation(session: &mut EditorSession, outcome: MutationOutcome) -> Cmd {
    session.commit(outcome.model, outcome.selection);
    changed(session)
}

fn changed(session: &EditorSession) -> Cmd {
    Cmd::batch(vec![
        Cmd::Redraw,
        Cmd::LengthChanged(session.length_status()),
    ])
}
