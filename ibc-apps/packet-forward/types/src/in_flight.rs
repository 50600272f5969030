//! Packets forwarded by this chain whose acknowledgement is pending.

use core::time::Duration;

use centauri_ibc_core::channel::{Height, Packet, TimeoutHeight};
use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_primitives::{Signer, Timestamp};
use centauri_transfer_types::proto::ProtoCoin;
use centauri_transfer_types::RawCoin;

use crate::error::PacketForwardError;

pub mod raw {
    use centauri_transfer_types::proto::ProtoCoin;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawInFlightPacket {
        #[prost(string, tag = "1")]
        pub original_sender_address: String,
        #[prost(string, tag = "2")]
        pub refund_channel_id: String,
        #[prost(string, tag = "3")]
        pub refund_port_id: String,
        #[prost(string, tag = "4")]
        pub packet_src_channel_id: String,
        #[prost(string, tag = "5")]
        pub packet_src_port_id: String,
        #[prost(uint64, tag = "6")]
        pub packet_timeout_timestamp: u64,
        #[prost(string, tag = "7")]
        pub packet_timeout_height: String,
        #[prost(bytes = "vec", tag = "8")]
        pub packet_data: Vec<u8>,
        #[prost(uint64, tag = "9")]
        pub refund_sequence: u64,
        #[prost(int32, tag = "10")]
        pub retries_remaining: i32,
        #[prost(uint64, tag = "11")]
        pub timeout: u64,
        #[prost(bool, tag = "12")]
        pub nonrefundable: bool,
        #[prost(message, optional, tag = "13")]
        pub protocol_fee: Option<ProtoCoin>,
        #[prost(string, tag = "14")]
        pub received_denom: String,
    }
}

use raw::RawInFlightPacket;

/// What the middleware remembers about a packet it received and forwarded,
/// keyed by the forwarded packet.
///
/// The `refund_*` and `packet_*` fields describe the received packet so
/// that its acknowledgement can be written once the forward settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFlightPacket {
    pub original_sender_address: Signer,
    /// Channel the packet arrived on, on this chain.
    pub refund_channel_id: ChannelId,
    pub refund_port_id: PortId,
    /// Channel the packet was sent from, on the previous chain.
    pub packet_src_channel_id: ChannelId,
    pub packet_src_port_id: PortId,
    pub packet_timeout_timestamp: Timestamp,
    pub packet_timeout_height: TimeoutHeight,
    /// Data of the received packet.
    pub packet_data: Vec<u8>,
    pub refund_sequence: Sequence,
    pub retries_remaining: u8,
    /// Timeout of every (re)sent forward.
    pub timeout: Duration,
    pub nonrefundable: bool,
    /// Protocol fee taken from the received amount, if any.
    pub protocol_fee: Option<RawCoin>,
    /// On-chain denom the forward was sent in.
    pub received_denom: String,
}

impl InFlightPacket {
    /// Rebuilds the packet this chain received, to acknowledge it.
    pub fn received_packet(&self) -> Packet {
        Packet {
            seq_on_a: self.refund_sequence,
            port_id_on_a: self.packet_src_port_id.clone(),
            chan_id_on_a: self.packet_src_channel_id.clone(),
            port_id_on_b: self.refund_port_id.clone(),
            chan_id_on_b: self.refund_channel_id.clone(),
            data: self.packet_data.clone(),
            timeout_height_on_b: self.packet_timeout_height,
            timeout_timestamp_on_b: self.packet_timeout_timestamp,
        }
    }
}

/// Key of the in-flight record of the forwarded packet.
pub fn in_flight_key(channel_id: &ChannelId, port_id: &PortId, sequence: Sequence) -> String {
    format!("{channel_id}/{port_id}/{sequence}")
}

fn invalid(reason: impl ToString) -> PacketForwardError {
    PacketForwardError::InvalidInFlightPacket {
        reason: reason.to_string(),
    }
}

fn parse_height(height: &str) -> Result<TimeoutHeight, PacketForwardError> {
    if height.is_empty() {
        return Ok(TimeoutHeight::Never);
    }
    let (revision_number, revision_height) = height
        .split_once('-')
        .ok_or_else(|| invalid(format!("timeout height `{height}`")))?;
    let revision_number = revision_number
        .parse()
        .map_err(|_| invalid(format!("timeout height `{height}`")))?;
    let revision_height = revision_height
        .parse()
        .map_err(|_| invalid(format!("timeout height `{height}`")))?;
    Ok(Height::new(revision_number, revision_height).into())
}

impl TryFrom<RawInFlightPacket> for InFlightPacket {
    type Error = PacketForwardError;

    fn try_from(raw: RawInFlightPacket) -> Result<Self, Self::Error> {
        let protocol_fee = raw
            .protocol_fee
            .map(RawCoin::try_from)
            .transpose()
            .map_err(|e| invalid(e))?;
        Ok(Self {
            original_sender_address: raw.original_sender_address.into(),
            refund_channel_id: raw.refund_channel_id.parse()?,
            refund_port_id: raw.refund_port_id.parse()?,
            packet_src_channel_id: raw.packet_src_channel_id.parse()?,
            packet_src_port_id: raw.packet_src_port_id.parse()?,
            packet_timeout_timestamp: Timestamp::from_nanoseconds(raw.packet_timeout_timestamp),
            packet_timeout_height: parse_height(&raw.packet_timeout_height)?,
            packet_data: raw.packet_data,
            refund_sequence: raw.refund_sequence.into(),
            retries_remaining: u8::try_from(raw.retries_remaining)
                .map_err(|_| invalid(format!("retries {}", raw.retries_remaining)))?,
            timeout: Duration::from_nanos(raw.timeout),
            nonrefundable: raw.nonrefundable,
            protocol_fee,
            received_denom: raw.received_denom,
        })
    }
}

impl From<InFlightPacket> for RawInFlightPacket {
    fn from(packet: InFlightPacket) -> Self {
        Self {
            original_sender_address: packet.original_sender_address.to_string(),
            refund_channel_id: packet.refund_channel_id.to_string(),
            refund_port_id: packet.refund_port_id.to_string(),
            packet_src_channel_id: packet.packet_src_channel_id.to_string(),
            packet_src_port_id: packet.packet_src_port_id.to_string(),
            packet_timeout_timestamp: packet.packet_timeout_timestamp.nanoseconds(),
            packet_timeout_height: Height::from(packet.packet_timeout_height).to_string(),
            packet_data: packet.packet_data,
            refund_sequence: packet.refund_sequence.value(),
            retries_remaining: i32::from(packet.retries_remaining),
            // saturates after ~584 years
            timeout: u64::try_from(packet.timeout.as_nanos()).unwrap_or(u64::MAX),
            nonrefundable: packet.nonrefundable,
            protocol_fee: packet.protocol_fee.map(ProtoCoin::from),
            received_denom: packet.received_denom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_flight() -> InFlightPacket {
        InFlightPacket {
            original_sender_address: "cosmos1sender".into(),
            refund_channel_id: ChannelId::new(3),
            refund_port_id: PortId::transfer(),
            packet_src_channel_id: ChannelId::new(8),
            packet_src_port_id: PortId::transfer(),
            packet_timeout_timestamp: Timestamp::from_nanoseconds(1_000),
            packet_timeout_height: Height::new(1, 110).into(),
            packet_data: b"{}".to_vec(),
            refund_sequence: 7u64.into(),
            retries_remaining: 2,
            timeout: Duration::from_secs(600),
            nonrefundable: false,
            protocol_fee: Some(RawCoin::new("ppica".to_string(), 5u64)),
            received_denom: "ppica".to_string(),
        }
    }

    #[test]
    fn raw_conversion_keeps_every_field() {
        let packet = in_flight();
        let raw = RawInFlightPacket::from(packet.clone());
        assert_eq!(raw.packet_timeout_height, "1-110");
        assert_eq!(raw.timeout, 600_000_000_000);
        assert_eq!(InFlightPacket::try_from(raw).unwrap(), packet);

        let mut without_height = in_flight();
        without_height.packet_timeout_height = TimeoutHeight::Never;
        without_height.protocol_fee = None;
        let raw = RawInFlightPacket::from(without_height.clone());
        assert_eq!(raw.packet_timeout_height, "0-0");
        assert_eq!(InFlightPacket::try_from(raw).unwrap(), without_height);
    }

    #[test]
    fn received_packet_is_rebuilt_from_the_refund_fields() {
        let packet = in_flight().received_packet();
        assert_eq!(packet.seq_on_a, Sequence::from(7u64));
        assert_eq!(packet.chan_id_on_a, ChannelId::new(8));
        assert_eq!(packet.chan_id_on_b, ChannelId::new(3));
        assert_eq!(packet.timeout_height_on_b, Height::new(1, 110).into());
    }

    #[test]
    fn keys_name_the_forwarded_packet() {
        assert_eq!(
            in_flight_key(&ChannelId::new(1), &PortId::transfer(), 42u64.into()),
            "channel-1/transfer/42"
        );
    }

    #[test]
    fn malformed_height_is_rejected() {
        let mut raw = RawInFlightPacket::from(in_flight());
        raw.packet_timeout_height = "110".to_string();
        assert!(InFlightPacket::try_from(raw).is_err());
    }
}
