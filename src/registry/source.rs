//! Chooser sources - per entity kind chooser configuration and payload
//! projection

use serde_json::Value;

use crate::chooser::{ChooserConfig, ChooserTarget};
use crate::links::{classify, LinkKind};
use crate::model::{Entity, EntityData};
use crate::translate::NoTranslation;

/// The closed set of chooser-backed entity sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChooserSource {
    Link,
    Document,
    Image,
    Embed,
}

impl ChooserSource {
    /// Configuration for opening the chooser.
    ///
    /// `existing` is the entity being edited, if any; `selected_text` is the
    /// plain text of the current selection and seeds the chooser's query.
    pub fn chooser_config(&self, existing: Option<&Entity>, selected_text: &str) -> ChooserConfig {
        match self {
            ChooserSource::Link => link_config(existing, selected_text),
            ChooserSource::Document => ChooserConfig::new(ChooserTarget::Document, selected_text),
            ChooserSource::Image => match existing {
                Some(entity) => {
                    let mut config = ChooserConfig::new(ChooserTarget::ImageFormat, selected_text);
                    if let Some(id) = entity.data.get("id") {
                        config = config.with_param("image_id", &scalar(id));
                    }
                    config
                        .with_optional_param("format", entity.data_str("format"))
                        .with_optional_param("alt_text", entity.data_str("alt"))
                }
                None => ChooserConfig::new(ChooserTarget::Image, selected_text)
                    .with_param("select_format", "true"),
            },
            ChooserSource::Embed => {
                let config = ChooserConfig::new(ChooserTarget::Embed, selected_text);
                match existing {
                    Some(entity) => config.with_optional_param("url", entity.data_str("url")),
                    None => config,
                }
            }
        }
    }

    /// Project a raw chooser payload down to the fields persisted on the
    /// entity. Fields missing from the payload are left out.
    pub fn filter_payload(&self, raw: &EntityData) -> EntityData {
        match self {
            ChooserSource::Link => {
                if has_value(raw, "id") {
                    pick(raw, &["url", "id", "parentId"])
                } else {
                    pick(raw, &["url"])
                }
            }
            ChooserSource::Document => pick(raw, &["id", "url", "filename"]),
            ChooserSource::Image => {
                let mut data = pick(raw, &["id"]);
                if let Some(src) = raw.get("preview").and_then(|p| p.get("url")) {
                    data.insert("src".to_string(), src.clone());
                }
                data.extend(pick(raw, &["alt", "format"]));
                data
            }
            ChooserSource::Embed => pick(
                raw,
                &["embedType", "url", "providerName", "authorName", "thumbnail", "title"],
            ),
        }
    }
}

fn link_config(existing: Option<&Entity>, selected_text: &str) -> ChooserConfig {
    let Some(entity) = existing else {
        return ChooserConfig::new(ChooserTarget::Page, selected_text).with_link_defaults(selected_text);
    };

    let decoration = classify(&entity.data, &NoTranslation);
    let url = decoration.canonical_url.unwrap_or_default();
    let config = match decoration.kind {
        LinkKind::Internal => {
            let config = ChooserConfig::new(ChooserTarget::Page, selected_text);
            match entity.data.get("parentId") {
                Some(parent) if !parent.is_null() => {
                    config.with_param("parent_page_id", &scalar(parent))
                }
                _ => config,
            }
        }
        LinkKind::Mail => ChooserConfig::new(ChooserTarget::EmailLink, selected_text)
            .with_param("link_url", url.trim_start_matches("mailto:")),
        LinkKind::Phone => ChooserConfig::new(ChooserTarget::PhoneLink, selected_text)
            .with_param("link_url", url.trim_start_matches("tel:")),
        LinkKind::Anchor => ChooserConfig::new(ChooserTarget::AnchorLink, selected_text)
            .with_param("link_url", url.trim_start_matches('#')),
        LinkKind::External => {
            ChooserConfig::new(ChooserTarget::ExternalLink, selected_text).with_param("link_url", &url)
        }
        LinkKind::Broken => ChooserConfig::new(ChooserTarget::Page, selected_text),
    };
    config.with_link_defaults(selected_text)
}

fn has_value(raw: &EntityData, field: &str) -> bool {
    match raw.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn pick(raw: &EntityData, fields: &[&str]) -> EntityData {
    fields
        .iter()
        .filter_map(|f| raw.get(*f).map(|v| (f.to_string(), v.clone())))
        .collect()
}

/// Render a JSON scalar as a query parameter value
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
