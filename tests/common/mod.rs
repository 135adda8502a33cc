//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use draftkit::chooser::{ChooserConfig, ChooserSession};
use draftkit::config::EditorConfig;
use draftkit::model::{Block, EntityData, TextModel};
use draftkit::session::EditorSession;

/// Create a model with one unstyled block per entry, keyed "a", "b", "c", ...
pub fn test_model(paragraphs: &[&str]) -> TextModel {
    let blocks = paragraphs
        .iter()
        .enumerate()
        .map(|(i, text)| Block::new(block_key(i), text))
        .collect();
    TextModel::new(blocks).unwrap()
}

pub fn block_key(index: usize) -> String {
    ((b'a' + index as u8) as char).to_string()
}

/// JSON object literal to entity data
pub fn payload(value: serde_json::Value) -> EntityData {
    value.as_object().cloned().unwrap_or_default()
}

/// Block texts in document order
pub fn texts(model: &TextModel) -> Vec<String> {
    model.blocks().map(|b| b.text_string()).collect()
}

/// What a chooser host saw
#[derive(Debug, Default)]
pub struct ChooserLog {
    pub opened: Vec<ChooserConfig>,
    pub closed: usize,
}

/// Chooser host that records into a shared log
pub struct RecordingChooser(pub Rc<RefCell<ChooserLog>>);

impl ChooserSession for RecordingChooser {
    fn open(&mut self, config: &ChooserConfig) {
        self.0.borrow_mut().opened.push(config.clone());
    }

    fn close(&mut self) {
        self.0.borrow_mut().closed += 1;
    }
}

/// Session over `model` with default config and a recording chooser host
pub fn test_session(model: TextModel) -> (EditorSession, Rc<RefCell<ChooserLog>>) {
    test_session_with_config(model, EditorConfig::default())
}

pub fn test_session_with_config(
    model: TextModel,
    config: EditorConfig,
) -> (EditorSession, Rc<RefCell<ChooserLog>>) {
    let log = Rc::new(RefCell::new(ChooserLog::default()));
    let session = EditorSession::new(model, config, Box::new(RecordingChooser(log.clone())));
    (session, log)
}
