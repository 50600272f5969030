//! Data types of the [ICS-20](https://github.com/cosmos/ibc/blob/main/spec/app/ics-020-fungible-token-transfer/README.md)
//! fungible token transfer as the Centauri transfer stack sees it: packet
//! data, traced denoms, coins, memos and the events of the transfer port.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

mod amount;
mod coin;
mod denom;
mod memo;

pub mod error;
pub mod events;
pub mod msgs;
pub mod packet;

pub use amount::*;
pub use coin::*;
pub use denom::*;
pub use memo::*;
pub use primitive_types::U256;

use centauri_ibc_core::channel::StatusValue;

/// Protobuf mirrors of the SDK types persisted by the transfer stack.
pub mod proto {
    /// `cosmos.base.v1beta1.Coin`
    #[derive(Clone, PartialEq, Eq, prost::Message)]
    pub struct ProtoCoin {
        #[prost(string, tag = "1")]
        pub denom: String,
        #[prost(string, tag = "2")]
        pub amount: String,
    }
}

/// Name of the transfer module in emitted events.
pub const MODULE_ID_STR: &str = "transfer";

/// Port the transfer application binds to.
pub const PORT_ID_STR: &str = "transfer";

/// Channel version negotiated by the transfer application.
pub const VERSION: &str = "ics20-1";

/// Result of a successful transfer acknowledgement: a single `0x01` byte,
/// base64 encoded.
pub const ACK_SUCCESS_B64: &str = "AQ==";

/// The status a successful transfer acknowledgement carries.
pub fn ack_success_b64() -> StatusValue {
    StatusValue::new(ACK_SUCCESS_B64).expect("ack status value is never supposed to be empty")
}
