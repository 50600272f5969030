//! Parachain token tracking.
//!
//! Tokens native to a parachain reach this chain over IBC as vouchers
//! (`ibc/{HASH}`). Governance registers such tokens so that the voucher can
//! be exchanged for a native denom on receipt and so that the forwarding
//! middleware does not prefix the denom again when it forwards them. Entries
//! can be scheduled for removal; [`abci::begin_blocker`] applies due removals
//! once per block.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod abci;
pub mod error;
pub mod keeper;
pub mod keys;
pub mod msgs;
pub mod relay;
pub mod types;

pub use error::TransferMiddlewareError;
pub use keeper::TransferMiddlewareKeeper;

/// Name of the module, used in store keys and logs.
pub const MODULE_NAME: &str = "transfermiddleware";
