//! draftkit - entity editing for block-structured rich text
//!
//! This crate provides the document model, link handling and the
//! chooser-driven entity mutation pipeline behind a rich-text editor,
//! driven through the Elm Architecture pattern (`EditorMsg` in, `Cmd` out).

pub mod chooser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod history;
pub mod length;
pub mod links;
pub mod messages;
pub mod model;
pub mod mutator;
pub mod paste;
pub mod registry;
pub mod selection_text;
pub mod session;
pub mod tracing;
pub mod translate;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use error::{DocumentError, Result};
pub use messages::EditorMsg;
pub use model::{Selection, TextModel};
pub use session::EditorSession;
