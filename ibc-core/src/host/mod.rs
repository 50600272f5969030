//! ICS-24 host identifiers and their validation.

pub mod error;
pub mod identifiers;
pub mod validate;

pub use error::IdentifierError;
