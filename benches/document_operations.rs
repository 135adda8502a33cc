//! Benchmarks for document mutation hot paths
//!
//! Run with: cargo bench document_operations

use draftkit::length::LengthLimit;
use draftkit::links::{validate, DEFAULT_SCHEMES};
use draftkit::model::{types, Block, EntityData, Mutability, Selection, TextModel};
use draftkit::selection_text::extract_text;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn document(blocks: usize) -> TextModel {
    let blocks = (0..blocks)
        .map(|i| Block::new(format!("b{i}"), "The quick brown fox jumps over the lazy dog"))
        .collect();
    TextModel::new(blocks).unwrap()
}

fn link_data() -> EntityData {
    let mut data = EntityData::new();
    data.insert("url".to_string(), "https://example.com".into());
    data
}

// ============================================================================
// Text replacement
// ============================================================================

#[divan::bench(args = [10, 1_000])]
fn replace_text_single_block(bencher: divan::Bencher, blocks: usize) {
    let model = document(blocks);
    let selection = Selection::within(format!("b{}", blocks / 2), 4, 9);
    bencher.bench(|| {
        model
            .replace_text_range(divan::black_box(&selection), "slow", None)
            .unwrap()
    });
}

#[divan::bench(args = [10, 1_000])]
fn replace_text_across_blocks(bencher: divan::Bencher, blocks: usize) {
    let model = document(blocks);
    let selection = Selection::new("b1", 4, format!("b{}", blocks - 1), 9);
    bencher.bench(|| {
        model
            .replace_text_range(divan::black_box(&selection), "", None)
            .unwrap()
    });
}

// ============================================================================
// Entities
// ============================================================================

#[divan::bench(args = [10, 1_000])]
fn wrap_selection_in_link(bencher: divan::Bencher, blocks: usize) {
    let (model, key) = document(blocks).create_entity(types::LINK, Mutability::Mutable, link_data());
    let selection = Selection::within("b0", 4, 9);
    bencher.bench(|| model.apply_entity(&selection, Some(&key)).unwrap());
}

#[divan::bench(args = [10, 1_000])]
fn insert_atomic_block(bencher: divan::Bencher, blocks: usize) {
    let (model, key) = document(blocks).create_entity(types::IMAGE, Mutability::Immutable, link_data());
    let selection = Selection::collapsed(format!("b{}", blocks / 2), 10);
    bencher.bench(|| model.insert_atomic_block(&selection, &key, " ").unwrap());
}

// ============================================================================
// Read-only queries
// ============================================================================

#[divan::bench(args = [10, 1_000])]
fn measure_length(bencher: divan::Bencher, blocks: usize) {
    let model = document(blocks);
    let limit = LengthLimit::new(Some(10_000));
    bencher.bench(|| limit.measure(divan::black_box(&model)));
}

#[divan::bench]
fn extract_whole_document(bencher: divan::Bencher) {
    let model = document(1_000);
    let selection = Selection::new("b0", 0, "b999", 43);
    bencher.bench(|| extract_text(&model, divan::black_box(&selection)).unwrap());
}

#[divan::bench]
fn validate_pasted_url() {
    validate(
        divan::black_box("https://example.com/some/path?query=1"),
        DEFAULT_SCHEMES,
    );
}

#[divan::bench]
fn validate_pasted_email() {
    validate(
        divan::black_box("first.last+tag@mail.example.co.uk"),
        DEFAULT_SCHEMES,
    );
}
