//! Implementation of the [fungible token transfer module](https://github.com/cosmos/ibc/blob/main/spec/app/ics-020-fungible-token-transfer/README.md)
//! (ICS-20) application logic, as wrapped by the Centauri transfer middleware.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod bank;
pub mod context;
pub mod handler;
pub mod module;

/// Re-exports the implementation of the IBC [fungible token
/// transfer](https://github.com/cosmos/ibc/blob/main/spec/app/ics-020-fungible-token-transfer/README.md)
/// (ICS-20) data structures.
pub mod types {
    #[doc(inline)]
    pub use centauri_transfer_types::*;
}
