//! Plain text spanned by a selection
//!
//! Blocks contribute only their own text: no separator is inserted between
//! blocks, matching how plain-text selection copy behaves.

use crate::error::Result;
use crate::model::{Selection, TextModel};

/// Text covered by `selection`, in document order.
///
/// Backward selections are normalised first, so extraction is
/// direction-invariant. A collapsed selection yields the empty string.
pub fn extract_text(model: &TextModel, selection: &Selection) -> Result<String> {
    let span = model.span(selection)?;
    if span.is_collapsed() {
        return Ok(String::new());
    }

    let mut text = String::new();
    for index in span.start_index..=span.end_index {
        let Some(block) = model.block_at(index) else {
            break;
        };
        let start = if index == span.start_index {
            span.start_offset
        } else {
            0
        };
        let end = if index == span.end_index {
            span.end_offset
        } else {
            block.len_chars()
        };
        text.push_str(&block.slice(start, end));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn model() -> TextModel {
        TextModel::new(vec![
            Block::new("a", "The quick"),
            Block::new("b", "brown fox"),
            Block::new("c", "jumps over"),
        ])
        .unwrap()
    }

    #[test]
    fn test_collapsed_is_empty() {
        assert_eq!(extract_text(&model(), &Selection::collapsed("b", 3)).unwrap(), "");
    }

    #[test]
    fn test_single_block_slices_only_the_range() {
        let text = extract_text(&model(), &Selection::within("a", 4, 9)).unwrap();
        assert_eq!(text, "quick");
    }

    #[test]
    fn test_multi_block_concatenates_without_separator() {
        let text = extract_text(&model(), &Selection::new("a", 4, "c", 5)).unwrap();
        assert_eq!(text, "quickbrown foxjumps");
    }

    #[test]
    fn test_backward_equals_forward() {
        let m = model();
        let forward = Selection::new("a", 4, "c", 5);
        let backward = Selection::new("c", 5, "a", 4).backward();
        assert_eq!(
            extract_text(&m, &backward).unwrap(),
            extract_text(&m, &forward).unwrap()
        );
    }

    #[test]
    fn test_unicode_offsets_are_code_points() {
        let m = TextModel::new(vec![Block::new("x", "a\u{1F600}b\u{2764}\u{FE0F}c")]).unwrap();
        assert_eq!(extract_text(&m, &Selection::within("x", 1, 3)).unwrap(), "\u{1F600}b");
    }

    #[test]
    fn test_unknown_block_is_not_found() {
        let err = extract_text(&model(), &Selection::within("nope", 0, 1)).unwrap_err();
        assert!(err.is_not_found());
    }
}
