//! Decoration of existing link entities

use serde::Serialize;
use serde_json::Value;

use crate::model::EntityData;
use crate::translate::Translate;

/// Translation key for links without a target
pub const BROKEN_LINK: &str = "Broken link";

/// What a link entity points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// No url at all
    Broken,
    /// Internal reference (has an `id`, e.g. a page)
    Internal,
    /// `mailto:` link
    Mail,
    /// `tel:` link
    Phone,
    /// In-page `#anchor`
    Anchor,
    /// Anything else
    External,
}

/// How a link entity should be presented
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDecoration {
    pub kind: LinkKind,
    /// The url as stored on the entity (`None` for broken links)
    pub canonical_url: Option<String>,
    /// Short human-readable label
    pub label: String,
}

/// Classify link entity data (`{url, id}`).
///
/// Checks run in a fixed order: missing url, internal id, `mailto:`,
/// `tel:`, `#anchor`, then external as the fallback.
pub fn classify(data: &EntityData, translate: &dyn Translate) -> LinkDecoration {
    let url = data.get("url").and_then(Value::as_str).unwrap_or_default();
    if url.is_empty() {
        return LinkDecoration {
            kind: LinkKind::Broken,
            canonical_url: None,
            label: translate.translate(BROKEN_LINK),
        };
    }

    let (kind, label) = if has_id(data) {
        (LinkKind::Internal, url.to_string())
    } else if let Some(address) = url.strip_prefix("mailto:") {
        (LinkKind::Mail, strip_query(address).to_string())
    } else if let Some(number) = url.strip_prefix("tel:") {
        (LinkKind::Phone, strip_query(number).to_string())
    } else if url.starts_with('#') {
        (LinkKind::Anchor, url.to_string())
    } else {
        (LinkKind::External, host_of(url).to_string())
    };

    LinkDecoration {
        kind,
        canonical_url: Some(url.to_string()),
        label,
    }
}

fn has_id(data: &EntityData) -> bool {
    match data.get("id") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn strip_query(s: &str) -> &str {
    s.split('?').next().unwrap_or(s)
}

/// Strip a leading `scheme://` (or bare `//`) and everything from the first
/// `/` onwards.
fn host_of(url: &str) -> &str {
    let rest = match url.find("//") {
        Some(0) => &url[2..],
        Some(idx) if is_scheme_prefix(&url[..idx]) => &url[idx + 2..],
        _ => url,
    };
    rest.split('/').next().unwrap_or(rest)
}

/// `word:` where word is one or more `[A-Za-z0-9_]`
fn is_scheme_prefix(prefix: &str) -> bool {
    match prefix.strip_suffix(':') {
        Some(scheme) => {
            !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::NoTranslation;
    use serde_json::json;

    fn data(value: serde_json::Value) -> EntityData {
        value.as_object().cloned().unwrap_or_default()
    }

    fn label_of(value: serde_json::Value) -> (LinkKind, String) {
        let d = classify(&data(value), &NoTranslation);
        (d.kind, d.label)
    }

    #[test]
    fn test_broken_link() {
        let d = classify(&data(json!({"url": null})), &NoTranslation);
        assert_eq!(d.kind, LinkKind::Broken);
        assert_eq!(d.canonical_url, None);
        assert_eq!(d.label, "Broken link");

        let d = classify(&data(json!({})), &|_: &str| "Länk saknas".to_string());
        assert_eq!(d.label, "Länk saknas");
    }

    #[test]
    fn test_internal_link_uses_raw_url() {
        assert_eq!(
            label_of(json!({"url": "/about/team/", "id": 3})),
            (LinkKind::Internal, "/about/team/".to_string())
        );
    }

    #[test]
    fn test_id_checked_before_schemes() {
        let (kind, _) = label_of(json!({"url": "mailto:a@b.com", "id": 9}));
        assert_eq!(kind, LinkKind::Internal);
    }

    #[test]
    fn test_mail_link_strips_scheme_and_query() {
        assert_eq!(
            label_of(json!({"url": "mailto:test@example.com?subject=hi"})),
            (LinkKind::Mail, "test@example.com".to_string())
        );
    }

    #[test]
    fn test_phone_link() {
        assert_eq!(
            label_of(json!({"url": "tel:+46700000000"})),
            (LinkKind::Phone, "+46700000000".to_string())
        );
    }

    #[test]
    fn test_anchor_link() {
        assert_eq!(
            label_of(json!({"url": "#section-2"})),
            (LinkKind::Anchor, "#section-2".to_string())
        );
    }

    #[test]
    fn test_external_link_label_is_host() {
        assert_eq!(
            label_of(json!({"url": "http://www.ex.com/"})),
            (LinkKind::External, "www.ex.com".to_string())
        );
        assert_eq!(label_of(json!({"url": "https://ex.com/a/b?c"})).1, "ex.com");
        assert_eq!(label_of(json!({"url": "//cdn.ex.com/x"})).1, "cdn.ex.com");
        assert_eq!(label_of(json!({"url": "ex.com/page"})).1, "ex.com");
    }

    #[test]
    fn test_canonical_url_is_stored_url() {
        let d = classify(&data(json!({"url": "https://ex.com/a"})), &NoTranslation);
        assert_eq!(d.canonical_url.as_deref(), Some("https://ex.com/a"));
    }
}
