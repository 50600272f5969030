//! Data structures of the packet forward middleware.
//!
//! A transfer whose memo carries a `forward` object is not credited to its
//! receiver: the middleware receives it on an intermediate account and sends
//! it on to the next chain, acknowledging the original packet only once the
//! forwarded one settles.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod config;
pub mod decimal;
pub mod error;
pub mod events;
pub mod in_flight;
pub mod metadata;
pub mod params;
pub mod receiver;

/// Module name, also the domain separator of override receiver addresses.
///
/// The misspelling is part of the derived addresses on live chains.
pub const MODULE_NAME: &str = "packetfowardmiddleware";

/// Prefix of every error acknowledgement written by the middleware.
pub const ERROR_ACK_PREFIX: &str = "packet-forward-middleware error: ";
