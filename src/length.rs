//! Character counting for length limits
//!
//! Counts Unicode code points, the way a native `maxlength` attribute does:
//! an astral-plane emoji counts as one, but multi-code-point sequences
//! (variation selectors, skin tones, ZWJ families) count once per code point.

use serde::Serialize;

use crate::model::TextModel;

/// Number of code points in `text`. Newlines count as one each.
pub fn count(text: &str) -> usize {
    text.chars().count()
}

/// Plain-text view of a document for length limits.
///
/// Concatenates block text in document order, skipping atomic blocks, and
/// drops all newlines (the server-side plain-text rendering discards them).
pub fn flatten(model: &TextModel) -> String {
    model
        .blocks()
        .filter(|b| !b.is_atomic())
        .flat_map(|b| b.text.chars())
        .filter(|c| *c != '\n')
        .collect()
}

/// Live count of a document against an optional maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthStatus {
    pub count: usize,
    pub max: Option<usize>,
}

impl LengthStatus {
    /// Characters left before the limit (negative when over)
    pub fn remaining(&self) -> Option<i64> {
        self.max.map(|max| max as i64 - self.count as i64)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.max, Some(max) if self.count > max)
    }
}

/// Maximum length in characters (None = unlimited)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthLimit {
    pub max: Option<usize>,
}

impl LengthLimit {
    pub fn new(max: Option<usize>) -> Self {
        Self { max }
    }

    pub fn unlimited() -> Self {
        Self { max: None }
    }

    /// Measure a document
    pub fn measure(&self, model: &TextModel) -> LengthStatus {
        LengthStatus {
            count: count(&flatten(model)),
            max: self.max,
        }
    }

    /// Check if inserting text would exceed the limit
    pub fn would_exceed(&self, current_len: usize, insert_len: usize) -> bool {
        if let Some(max) = self.max {
            current_len + insert_len > max
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, EntityKey};

    #[test]
    fn test_count_code_points() {
        assert_eq!(count(""), 0);
        assert_eq!(count("\n"), 1);
        assert_eq!(count("123\n45"), 6);
        assert_eq!(count("\u{1F600}"), 1);
        // Heart + variation selector-16
        assert_eq!(count("\u{2764}\u{FE0F}"), 2);
        // Thumbs up + skin tone modifier
        assert_eq!(count("\u{1F44D}\u{1F3FD}"), 2);
        // Man, ZWJ, woman, ZWJ, girl
        assert_eq!(count("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}"), 5);
    }

    #[test]
    fn test_flatten_skips_atomic_blocks_and_newlines() {
        let model = TextModel::new(vec![
            Block::new("a", "Hello"),
            Block::atomic("b", " ", EntityKey::from(0)),
            Block::new("c", "line\nbreak"),
        ])
        .unwrap();
        assert_eq!(flatten(&model), "Hellolinebreak");
    }

    #[test]
    fn test_limit_measure() {
        let model = TextModel::new(vec![Block::new("a", "1234"), Block::new("b", "56")]).unwrap();
        let status = LengthLimit::new(Some(5)).measure(&model);
        assert_eq!(status.count, 6);
        assert!(status.is_over());
        assert_eq!(status.remaining(), Some(-1));

        let unlimited = LengthLimit::unlimited().measure(&model);
        assert!(!unlimited.is_over());
        assert_eq!(unlimited.remaining(), None);
    }

    #[test]
    fn test_would_exceed() {
        let limit = LengthLimit::new(Some(10));
        assert!(!limit.would_exceed(5, 5));
        assert!(limit.would_exceed(8, 5));
        assert!(!LengthLimit::unlimited().would_exceed(1000, 1000));
    }
}
