//! Defines the token transfer message type

use centauri_ibc_core::channel::{ChannelError, TimeoutHeight};
use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_ibc_core::primitives::Timestamp;

use crate::error::TokenTransferError;
use crate::packet::PacketData;

/// Message used to build an ICS20 token transfer packet.
///
/// Note that this message is not a packet yet, as it lacks the proper sequence
/// number, and destination port/channel. The sender of the packet only
/// specifies the information related to the transfer of the token, and the
/// send handler builds the packet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct MsgTransfer {
    /// the port on which the packet will be sent
    pub port_id_on_a: PortId,
    /// the channel by which the packet will be sent
    pub chan_id_on_a: ChannelId,
    /// token transfer packet data of the packet that will be sent
    pub packet_data: PacketData,
    /// Timeout height relative to the current block height.
    /// The timeout is disabled when set to `Never`.
    pub timeout_height_on_b: TimeoutHeight,
    /// Absolute timeout timestamp on the receiving chain.
    /// The timeout is disabled when set to 0.
    pub timeout_timestamp_on_b: Timestamp,
}

impl MsgTransfer {
    /// Stateless checks: a positive amount, non-empty addresses, and at
    /// least one timeout.
    pub fn validate_basic(&self) -> Result<(), TokenTransferError> {
        if self.packet_data.token.amount.is_zero() {
            return Err(TokenTransferError::ZeroAmount);
        }
        if self.packet_data.sender.is_empty() || self.packet_data.receiver.is_empty() {
            return Err(TokenTransferError::EmptyAddress);
        }
        // Packet timeout height and packet timeout timestamp cannot both be unset.
        if !self.timeout_height_on_b.is_set() && !self.timeout_timestamp_on_b.is_set() {
            return Err(ChannelError::MissingTimeout.into());
        }
        Ok(())
    }
}
