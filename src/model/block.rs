//! Blocks - paragraph-like units of a document
//!
//! Offsets and lengths of all ranges are measured in Unicode code points,
//! which is also how `ropey` indexes characters.

use ropey::Rope;

use super::entity::{EntityData, EntityKey};

/// Block type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    /// Plain paragraph
    #[default]
    Unstyled,
    /// Standalone block carrying exactly one entity over a placeholder
    Atomic,
    /// Any other tag (headings, list items, ...) carried through untouched
    Other(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Atomic => "atomic",
            BlockType::Other(tag) => tag,
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, BlockType::Atomic)
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        match tag {
            "unstyled" => BlockType::Unstyled,
            "atomic" => BlockType::Atomic,
            other => BlockType::Other(other.to_string()),
        }
    }
}

/// Anything annotating a `[offset, offset + length)` span of block text
pub trait Annotation: Clone {
    fn offset(&self) -> usize;
    fn length(&self) -> usize;
    fn with_span(&self, offset: usize, length: usize) -> Self;

    fn end(&self) -> usize {
        self.offset().saturating_add(self.length())
    }
}

/// A span of block text tagged with an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: EntityKey,
}

impl Annotation for EntityRange {
    fn offset(&self) -> usize {
        self.offset
    }

    fn length(&self) -> usize {
        self.length
    }

    fn with_span(&self, offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            key: self.key.clone(),
        }
    }
}

/// A span of block text carrying an inline style (bold, italic, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

impl Annotation for StyleRange {
    fn offset(&self) -> usize {
        self.offset
    }

    fn length(&self) -> usize {
        self.length
    }

    fn with_span(&self, offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            style: self.style.clone(),
        }
    }
}

/// Keep only the parts of `ranges` lying before `at`.
pub(crate) fn clip_before<A: Annotation>(ranges: &[A], at: usize) -> Vec<A> {
    ranges
        .iter()
        .filter(|r| r.offset() < at && r.length() > 0)
        .map(|r| r.with_span(r.offset(), r.end().min(at) - r.offset()))
        .collect()
}

/// Keep only the parts of `ranges` lying at or after `at`, moved so that
/// `at` lands on `origin`.
pub(crate) fn clip_after<A: Annotation>(ranges: &[A], at: usize, origin: usize) -> Vec<A> {
    ranges
        .iter()
        .filter(|r| r.end() > at && r.length() > 0)
        .map(|r| {
            let start = r.offset().max(at);
            r.with_span(start - at + origin, r.end() - start)
        })
        .collect()
}

/// Ranges of a block after `[start, end)` is replaced by `inserted` chars.
pub(crate) fn splice<A: Annotation>(ranges: &[A], start: usize, end: usize, inserted: usize) -> Vec<A> {
    let mut out = clip_before(ranges, start);
    out.extend(clip_after(ranges, end, start + inserted));
    out
}

/// One paragraph-like unit of a document
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub key: String,
    pub text: Rope,
    pub block_type: BlockType,
    pub depth: usize,
    pub entity_ranges: Vec<EntityRange>,
    pub inline_style_ranges: Vec<StyleRange>,
    pub data: EntityData,
}

impl Block {
    /// Create an unstyled block with plain text
    pub fn new(key: impl Into<String>, text: &str) -> Self {
        Self {
            key: key.into(),
            text: Rope::from_str(text),
            block_type: BlockType::Unstyled,
            depth: 0,
            entity_ranges: Vec::new(),
            inline_style_ranges: Vec::new(),
            data: EntityData::new(),
        }
    }

    /// Create an atomic block holding `entity` over `placeholder`
    pub fn atomic(key: impl Into<String>, placeholder: &str, entity: EntityKey) -> Self {
        let length = placeholder.chars().count();
        Self {
            block_type: BlockType::Atomic,
            entity_ranges: vec![EntityRange {
                offset: 0,
                length,
                key: entity,
            }],
            ..Self::new(key, placeholder)
        }
    }

    pub fn with_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    pub fn with_entity_range(mut self, offset: usize, length: usize, key: EntityKey) -> Self {
        self.entity_ranges.push(EntityRange {
            offset,
            length,
            key,
        });
        self.entity_ranges.sort_by_key(|r| r.offset);
        self
    }

    pub fn with_style_range(mut self, offset: usize, length: usize, style: &str) -> Self {
        self.inline_style_ranges.push(StyleRange {
            offset,
            length,
            style: style.to_string(),
        });
        self
    }

    /// Length in code points
    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn is_atomic(&self) -> bool {
        self.block_type.is_atomic()
    }

    /// Text as an owned string
    pub fn text_string(&self) -> String {
        self.text.to_string()
    }

    /// Text in `[start, end)`, clamped to the block
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.min(len);
        if start >= end {
            return String::new();
        }
        self.text.slice(start..end).to_string()
    }

    /// Entity covering the character at `offset`
    pub fn entity_at(&self, offset: usize) -> Option<&EntityKey> {
        self.entity_ranges
            .iter()
            .find(|r| r.offset <= offset && offset < r.end())
            .map(|r| &r.key)
    }

    /// Entity key carried by an atomic block
    pub fn atomic_entity(&self) -> Option<&EntityKey> {
        if !self.is_atomic() {
            return None;
        }
        self.entity_ranges.first().map(|r| &r.key)
    }

    pub fn references(&self, key: &EntityKey) -> bool {
        self.entity_ranges.iter().any(|r| &r.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(offset: usize, length: usize, key: &str) -> EntityRange {
        EntityRange {
            offset,
            length,
            key: EntityKey::from(key),
        }
    }

    #[test]
    fn test_block_type_tags() {
        assert_eq!(BlockType::from("atomic"), BlockType::Atomic);
        assert_eq!(BlockType::from("unstyled"), BlockType::Unstyled);
        assert_eq!(BlockType::from("header-one").as_str(), "header-one");
    }

    #[test]
    fn test_slice_clamps() {
        let block = Block::new("a", "héllo");
        assert_eq!(block.slice(1, 3), "él");
        assert_eq!(block.slice(3, 99), "lo");
        assert_eq!(block.slice(4, 2), "");
    }

    #[test]
    fn test_splice_shifts_following_ranges() {
        let ranges = vec![range(0, 2, "a"), range(6, 3, "b")];
        let out = splice(&ranges, 3, 5, 4);
        assert_eq!(out, vec![range(0, 2, "a"), range(8, 3, "b")]);
    }

    #[test]
    fn test_splice_drops_covered_ranges() {
        let ranges = vec![range(3, 2, "a")];
        assert!(splice(&ranges, 2, 6, 0).is_empty());
    }

    #[test]
    fn test_splice_splits_straddling_range() {
        // Inserting inside a range does not extend it over the new text
        let ranges = vec![range(0, 5, "a")];
        let out = splice(&ranges, 2, 2, 3);
        assert_eq!(out, vec![range(0, 2, "a"), range(5, 3, "a")]);
    }

    #[test]
    fn test_entity_at() {
        let block = Block::new("a", "hello world").with_entity_range(6, 5, EntityKey::from("1"));
        assert_eq!(block.entity_at(6), Some(&EntityKey::from("1")));
        assert_eq!(block.entity_at(5), None);
        assert_eq!(block.entity_at(11), None);
    }

    #[test]
    fn test_atomic_block_holds_one_entity() {
        let block = Block::atomic("img", " ", EntityKey::from("4"));
        assert!(block.is_atomic());
        assert_eq!(block.atomic_entity(), Some(&EntityKey::from("4")));
        assert_eq!(block.entity_ranges[0].length, 1);
    }
}
