//! Translation boundary
//!
//! Human-readable strings produced by the core (such as the broken-link
//! label) are looked up through this trait. The core never formats or
//! pluralizes on its own.

/// Looks up a localized string by its source key
pub trait Translate {
    fn translate(&self, key: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Returns every key unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translate for NoTranslation {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}
