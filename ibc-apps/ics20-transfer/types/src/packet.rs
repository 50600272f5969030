//! ICS-20 packet payload.

use core::str::FromStr;

use centauri_ibc_core::primitives::Signer;

use super::error::TokenTransferError;
use super::{Amount, Memo, PrefixedCoin, PrefixedDenom};

/// JSON layout of ICS-20 packet bytes.
///
/// Fields are declared in lexicographic order so the serialized bytes match
/// the sorted JSON written by ibc-go.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawPacketData {
    pub amount: String,
    pub denom: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
    pub receiver: String,
    pub sender: String,
}

/// A decoded transfer packet: the traced coin plus both ends' addresses.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPacketData", into = "RawPacketData")]
pub struct PacketData {
    pub token: PrefixedCoin,
    pub sender: Signer,
    pub receiver: Signer,
    pub memo: Memo,
}

impl PacketData {
    /// Decodes packet bytes. Any failure, including a non-JSON payload,
    /// yields `PacketDataDeserialization`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenTransferError> {
        serde_json::from_slice(bytes).map_err(|_| TokenTransferError::PacketDataDeserialization)
    }

    /// Encodes the packet data to its JSON wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let raw = RawPacketData::from(self.clone());
        serde_json::to_vec(&raw).unwrap_or_default()
    }
}

impl TryFrom<RawPacketData> for PacketData {
    type Error = TokenTransferError;

    fn try_from(raw_pkt_data: RawPacketData) -> Result<Self, Self::Error> {
        // This denom may be prefixed or unprefixed.
        let denom = PrefixedDenom::from_str(&raw_pkt_data.denom)?;
        let amount = Amount::from_str(&raw_pkt_data.amount)?;
        Ok(Self {
            token: PrefixedCoin { denom, amount },
            sender: raw_pkt_data.sender.into(),
            receiver: raw_pkt_data.receiver.into(),
            memo: raw_pkt_data.memo.into(),
        })
    }
}

impl From<PacketData> for RawPacketData {
    fn from(pkt_data: PacketData) -> Self {
        Self {
            denom: pkt_data.token.denom.to_string(),
            amount: pkt_data.token.amount.to_string(),
            sender: pkt_data.sender.to_string(),
            receiver: pkt_data.receiver.to_string(),
            memo: pkt_data.memo.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const ALICE: &str = "centauri1alice";
    const BOB: &str = "osmo1bob";

    fn pica(memo: &str) -> PacketData {
        PacketData {
            token: PrefixedCoin::new("transfer/channel-2/ppica".parse().unwrap(), 10u64),
            sender: ALICE.into(),
            receiver: BOB.into(),
            memo: memo.into(),
        }
    }

    #[rstest]
    #[case::with_memo(
        "hi",
        r#"{"amount":"10","denom":"transfer/channel-2/ppica","memo":"hi","receiver":"osmo1bob","sender":"centauri1alice"}"#
    )]
    #[case::memo_omitted_when_empty(
        "",
        r#"{"amount":"10","denom":"transfer/channel-2/ppica","receiver":"osmo1bob","sender":"centauri1alice"}"#
    )]
    fn wire_bytes_are_sorted_json(#[case] memo: &str, #[case] json: &str) {
        let data = pica(memo);
        assert_eq!(data.to_bytes(), json.as_bytes());
        assert_eq!(PacketData::from_bytes(json.as_bytes()).unwrap(), data);
    }

    #[test]
    fn field_order_on_the_wire_is_irrelevant() {
        let json = r#"{"denom":"transfer/channel-2/ppica","sender":"a","receiver":"b","amount":"7","memo":"{}"}"#;
        let data = PacketData::from_bytes(json.as_bytes()).unwrap();
        assert_eq!(data.token.denom.to_string(), "transfer/channel-2/ppica");
        assert_eq!(data.token.amount, Amount::from(7u64));
        assert_eq!(data.memo.as_str(), "{}");
    }

    #[rstest]
    #[case::not_json(b"not json".as_slice())]
    #[case::bad_amount(br#"{"amount":"x","denom":"a","receiver":"b","sender":"c"}"#.as_slice())]
    #[case::empty_denom(br#"{"amount":"1","denom":"","receiver":"b","sender":"c"}"#.as_slice())]
    #[case::missing_sender(br#"{"amount":"1","denom":"a","receiver":"b"}"#.as_slice())]
    fn foreign_payloads_fail_to_decode(#[case] bytes: &[u8]) {
        assert!(matches!(
            PacketData::from_bytes(bytes),
            Err(TokenTransferError::PacketDataDeserialization)
        ));
    }
}
