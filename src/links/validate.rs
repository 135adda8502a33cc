//! Interpreting pasted text as a link

use regex::Regex;
use std::sync::LazyLock;

/// Schemes accepted for pasted absolute URLs
pub const DEFAULT_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Email local part: dot-atom, or a quoted string of printable ASCII.
static USER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r##"(?i)^[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*$"##,
        r##"|^"([\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*"$"##,
    ))
    .expect("email local-part pattern is valid")
});

/// Email domain: dotted labels, the last of which has at least two
/// characters. No label starts or ends with a hyphen.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])$")
        .expect("email domain pattern is valid")
});

/// Validate `text` as a link target.
///
/// Returns the canonical value to store on a LINK entity, or `None` when the
/// text is not a link (the caller should treat it as plain text):
///
/// - text containing `@` is only ever considered as an email address and
///   becomes `mailto:<text>`;
/// - anything else must parse as an absolute URL whose scheme is in
///   `schemes`, and is returned unmodified.
pub fn validate<S: AsRef<str>>(text: &str, schemes: &[S]) -> Option<String> {
    if let Some((user, domain)) = text.split_once('@') {
        if USER_RE.is_match(user) && DOMAIN_RE.is_match(domain) {
            return Some(format!("mailto:{text}"));
        }
        tracing::trace!(text, "rejected email-like paste");
        return None;
    }

    match url::Url::parse(text) {
        Ok(parsed) => {
            let allowed = schemes
                .iter()
                .any(|s| s.as_ref().eq_ignore_ascii_case(parsed.scheme()));
            if allowed {
                Some(text.to_string())
            } else {
                tracing::trace!(scheme = parsed.scheme(), "rejected url scheme");
                None
            }
        }
        Err(e) => {
            tracing::trace!(text, error = %e, "not an absolute url");
            None
        }
    }
}
