//! Builders of the transfers and memos tests push through mock chains.

pub mod memo;
pub mod transfer;

pub use memo::ForwardMemoConfig;
pub use transfer::{MsgTransferConfig, PacketDataConfig, DEFAULT_TRANSFER_TIMEOUT};
