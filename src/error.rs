//! Error types for document mutations
//!
//! `NotFound` variants indicate a programming error (a key that the caller
//! got from somewhere other than the model it passed in). `InvalidMutation`
//! is recoverable: the caller is expected to take the create-new-entity path.

use thiserror::Error;

use crate::model::EntityKey;

/// Errors produced by [`TextModel`](crate::model::TextModel) operations and the
/// mutation pipeline built on top of it.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("block not found: {0}")]
    BlockNotFound(String),

    #[error("entity not found: {0}")]
    EntityNotFound(EntityKey),

    #[error("invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("range {offset}+{length} is outside block {block}")]
    RangeOutOfBounds {
        block: String,
        offset: usize,
        length: usize,
    },

    #[error("duplicate block key: {0}")]
    DuplicateBlockKey(String),

    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("a chooser is already open for this editor")]
    ChooserBusy,

    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocumentError {
    /// True for the "referenced key does not exist" family
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BlockNotFound(_) | Self::EntityNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;
