//! Shared utilities.

mod validate;

pub use validate::ValidatedJson;
