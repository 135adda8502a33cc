//! Selections over a block-structured document
//!
//! A selection is a value object: it is always passed alongside a
//! [`TextModel`](super::TextModel), never stored inside it.

use serde::{Deserialize, Serialize};

/// A location in the document: block key + code point offset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionPoint {
    pub key: String,
    pub offset: usize,
}

impl SelectionPoint {
    pub fn new(key: impl Into<String>, offset: usize) -> Self {
        Self {
            key: key.into(),
            offset,
        }
    }
}

/// Anchor/focus selection.
///
/// When `is_backward` is false the anchor precedes or equals the focus in
/// document order; when true the focus comes first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub anchor_key: String,
    pub anchor_offset: usize,
    pub focus_key: String,
    pub focus_offset: usize,
    #[serde(default)]
    pub is_backward: bool,
}

impl Selection {
    pub fn new(
        anchor_key: impl Into<String>,
        anchor_offset: usize,
        focus_key: impl Into<String>,
        focus_offset: usize,
    ) -> Self {
        Self {
            anchor_key: anchor_key.into(),
            anchor_offset,
            focus_key: focus_key.into(),
            focus_offset,
            is_backward: false,
        }
    }

    /// Create a collapsed selection (caret)
    pub fn collapsed(key: impl Into<String>, offset: usize) -> Self {
        let key = key.into();
        Self::new(key.clone(), offset, key, offset)
    }

    /// Selection within a single block
    pub fn within(key: impl Into<String>, start: usize, end: usize) -> Self {
        let key = key.into();
        Self::new(key.clone(), start, key, end)
    }

    pub fn backward(mut self) -> Self {
        self.is_backward = true;
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn anchor(&self) -> SelectionPoint {
        SelectionPoint::new(self.anchor_key.clone(), self.anchor_offset)
    }

    pub fn focus(&self) -> SelectionPoint {
        SelectionPoint::new(self.focus_key.clone(), self.focus_offset)
    }

    /// The point that comes first in document order
    pub fn start(&self) -> SelectionPoint {
        if self.is_backward {
            self.focus()
        } else {
            self.anchor()
        }
    }

    /// The point that comes last in document order
    pub fn end(&self) -> SelectionPoint {
        if self.is_backward {
            self.anchor()
        } else {
            self.focus()
        }
    }

    /// Same range, forward direction
    pub fn normalized(&self) -> Self {
        let start = self.start();
        let end = self.end();
        Self::new(start.key, start.offset, end.key, end.offset)
    }

    /// Collapse to the end point
    pub fn collapse_to_end(&self) -> Self {
        let end = self.end();
        Self::collapsed(end.key, end.offset)
    }

    /// Collapse to the start point
    pub fn collapse_to_start(&self) -> Self {
        let start = self.start();
        Self::collapsed(start.key, start.offset)
    }
}
