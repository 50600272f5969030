//! The parts of IBC core that token-transfer applications and their
//! middleware are written against.
//!
//! Channel handshakes, packet commitments and light clients live in the host;
//! this crate only carries the packet-level types and the callbacks the host
//! invokes on the application stack bound to a port.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod channel;
pub mod host;
pub mod router;

pub use centauri_primitives as primitives;
