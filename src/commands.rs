//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host should perform after an update.

use crate::chooser::ChooserConfig;
use crate::length::LengthStatus;

/// Side effects returned by [`update`](crate::update::update)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Document or selection changed; re-render
    Redraw,
    /// A chooser was opened with this configuration
    OpenChooser(ChooserConfig),
    /// The document changed and its length was re-measured
    LengthChanged(LengthStatus),
    /// An operation was rejected; show the message to the user
    ShowError(String),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::LengthChanged(_) => true,
            // The chooser is drawn by the host itself
            Cmd::OpenChooser(_) => false,
            Cmd::ShowError(_) => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// The length status carried by this command, if any
    pub fn length_status(&self) -> Option<&LengthStatus> {
        match self {
            Cmd::LengthChanged(status) => Some(status),
            Cmd::Batch(cmds) => cmds.iter().find_map(|c| c.length_status()),
            _ => None,
        }
    }
}
