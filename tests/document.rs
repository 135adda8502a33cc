//! Document model tests - selection extraction, length counting, raw round trip

mod common;

use common::{payload, test_model, test_session};
use draftkit::chooser::ChooserOutcome;
use draftkit::length::{count, flatten, LengthLimit};
use draftkit::messages::EditorMsg;
use draftkit::model::{types, Selection, TextModel};
use draftkit::selection_text::extract_text;
use draftkit::update::update;
use serde_json::json;

// ========================================================================
// Selection extraction
// ========================================================================

#[test]
fn test_extract_single_block_is_substring() {
    let model = test_model(&["The quick brown fox"]);
    for (start, end) in [(0, 3), (4, 9), (10, 19), (0, 19)] {
        let text = extract_text(&model, &Selection::within("a", start, end)).unwrap();
        let expected: String = "The quick brown fox"
            .chars()
            .skip(start)
            .take(end - start)
            .collect();
        assert_eq!(text, expected);
    }
}

#[test]
fn test_extract_is_direction_invariant() {
    let model = test_model(&["alpha", "beta", "gamma"]);
    let forward = Selection::new("a", 2, "c", 3);
    let backward = Selection::new("c", 3, "a", 2).backward();

    assert_eq!(
        extract_text(&model, &forward).unwrap(),
        extract_text(&model, &backward).unwrap()
    );
}

#[test]
fn test_extract_multi_block_concatenates() {
    let model = test_model(&["alpha", "beta", "gamma"]);
    let text = extract_text(&model, &Selection::new("a", 2, "c", 3)).unwrap();
    assert_eq!(text, "phabetagam");
}

#[test]
fn test_extract_collapsed_is_empty() {
    let model = test_model(&["alpha"]);
    assert_eq!(
        extract_text(&model, &Selection::collapsed("a", 2)).unwrap(),
        ""
    );
}

#[test]
fn test_extract_unknown_block_is_error() {
    let model = test_model(&["alpha"]);
    let err = extract_text(&model, &Selection::collapsed("nope", 0)).unwrap_err();
    assert!(err.is_not_found());
}

// ========================================================================
// Length counting
// ========================================================================

#[test]
fn test_count_matches_native_maxlength() {
    assert_eq!(count(""), 0);
    assert_eq!(count("\n"), 1);
    assert_eq!(count("123\n45"), 6);
    // Heart + variation selector
    assert_eq!(count("\u{2764}\u{fe0f}"), 2);
}

#[test]
fn test_flatten_joins_blocks_without_newlines() {
    let model = test_model(&["one", "two"]);
    assert_eq!(flatten(&model), "onetwo");
}

#[test]
fn test_length_limit_reports_over() {
    let model = test_model(&["hello", "world"]);
    let status = LengthLimit::new(Some(8)).measure(&model);
    assert_eq!(status.count, 10);
    assert_eq!(status.remaining(), Some(-2));
    assert!(status.is_over());

    assert!(!LengthLimit::unlimited().measure(&model).is_over());
}

// ========================================================================
// Raw round trip
// ========================================================================

#[test]
fn test_round_trip_after_mutations() {
    let (mut session, _log) = test_session(test_model(&["hello world", "second"]));

    update(
        &mut session,
        EditorMsg::SetSelection(Selection::within("a", 0, 5)),
    );
    update(&mut session, EditorMsg::Paste("https://example.com".to_string()));

    update(
        &mut session,
        EditorMsg::SetSelection(Selection::collapsed("b", 3)),
    );
    update(
        &mut session,
        EditorMsg::OpenChooser {
            entity_type: types::IMAGE.to_string(),
            existing: None,
        },
    );
    update(
        &mut session,
        EditorMsg::ChooserResolved(ChooserOutcome::chosen(payload(json!({
            "id": 5, "alt": "pic", "format": "fullwidth",
        })))),
    );
    assert_eq!(session.model.entity_count(), 2);

    let json = session.model.to_json().unwrap();
    let restored = TextModel::from_json(&json).unwrap();
    assert_eq!(restored, session.model);
}

#[test]
fn test_raw_document_format() {
    let json = r#"{
        "blocks": [
            {
                "key": "x1",
                "text": "a link",
                "type": "unstyled",
                "depth": 0,
                "inlineStyleRanges": [{"offset": 0, "length": 1, "style": "BOLD"}],
                "entityRanges": [{"offset": 2, "length": 4, "key": 0}],
                "data": {}
            },
            {
                "key": "x2",
                "text": " ",
                "type": "atomic",
                "entityRanges": [{"offset": 0, "length": 1, "key": 1}]
            }
        ],
        "entityMap": {
            "0": {"type": "LINK", "mutability": "MUTABLE", "data": {"url": "https://a.example"}},
            "1": {"type": "IMAGE", "mutability": "IMMUTABLE", "data": {"id": 3}}
        }
    }"#;

    let model = TextModel::from_json(json).unwrap();
    assert_eq!(model.block_count(), 2);
    assert!(model.block("x2").unwrap().is_atomic());

    let link = model.entity_at("x1", 3).unwrap().unwrap();
    assert_eq!(
        model.entity(link).unwrap().data_str("url"),
        Some("https://a.example")
    );
    assert_eq!(flatten(&model), "a link");

    let restored = TextModel::from_json(&model.to_json().unwrap()).unwrap();
    assert_eq!(restored, model);
}
