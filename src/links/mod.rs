//! Link classification and validation
//!
//! - [`classify`] decides how an existing LINK entity is decorated
//!   (broken, internal page, email, phone, anchor, external).
//! - [`validate`] decides whether arbitrary pasted text is a link, and
//!   returns the canonical URL to store on the entity.

mod classify;
mod validate;

pub use classify::{classify, LinkDecoration, LinkKind, BROKEN_LINK};
pub use validate::{validate, DEFAULT_SCHEMES};
