//! Byte-keyed stores backing the Centauri keepers.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod context;
pub mod impls;
pub mod types;
pub mod utils;

pub use context::{prefixed_key, Store, StoreError};
