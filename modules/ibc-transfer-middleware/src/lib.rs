//! Bridge fees charged on outbound ICS-20 transfers.
//!
//! Governance configures, per source channel, which tokens may leave the
//! chain and what they cost: a minimum fee (optionally raised by a priority
//! surcharge named in the transfer memo) plus a share of what is left. The
//! [`FeeKeeper`](keeper::FeeKeeper) computes the fee and remembers it per
//! packet sequence so it can be returned if the transfer fails.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod error;
pub mod keeper;
pub mod keys;
pub mod query;
pub mod transfer;
pub mod types;

pub use error::FeeError;
pub use keeper::FeeKeeper;

/// Name of the module, used in store keys and logs.
pub const MODULE_NAME: &str = "ibctransfermiddleware";
