//! Contains primitives types common to the Centauri IBC components.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

mod types;
pub use types::*;
