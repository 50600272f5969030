//! Denominations of transferred tokens: a base denom behind the trace of
//! channel hops it travelled through, e.g. `transfer/channel-7/ppica`.
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use derive_more::Display;
use sha2::{Digest, Sha256};

use super::error::TokenTransferError;

/// Prefix of hashed voucher denoms.
pub const IBC_DENOM_PREFIX: &str = "ibc";

/// Denom of the token on its origin chain, e.g. `ppica` or
/// `factory/osmo1.../dust`. Never empty.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Display)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BaseDenom(String);

impl BaseDenom {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BaseDenom {
    type Err = TokenTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(TokenTransferError::EmptyBaseDenom);
        }
        Ok(Self(s.to_owned()))
    }
}

/// A single hop of a trace: the channel end the token arrived through.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct TracePrefix {
    port_id: PortId,
    channel_id: ChannelId,
}

impl TracePrefix {
    pub fn new(port_id: PortId, channel_id: ChannelId) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Reads a hop from a `port` and a `channel` segment.
    fn parse(port: &str, channel: &str) -> Option<Self> {
        Some(Self::new(port.parse().ok()?, channel.parse().ok()?))
    }
}

impl Display for TracePrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port_id, self.channel_id)
    }
}

/// Hops of a token, most recent first, as they are written in a denom.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct TracePath(Vec<TracePrefix>);

impl TracePath {
    pub fn new(hops: Vec<TracePrefix>) -> Self {
        Self(hops)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `prefix` is the most recent hop.
    pub fn starts_with(&self, prefix: &TracePrefix) -> bool {
        self.0.first() == Some(prefix)
    }

    /// Drops the most recent hop when it is `prefix`.
    pub fn remove_prefix(&mut self, prefix: &TracePrefix) {
        if self.starts_with(prefix) {
            self.0.remove(0);
        }
    }

    /// Records `prefix` as the most recent hop.
    pub fn add_prefix(&mut self, prefix: TracePrefix) {
        self.0.insert(0, prefix);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn hops(&self) -> &[TracePrefix] {
        &self.0
    }
}

/// Strict parsing: every pair of segments must be a valid hop.
impl FromStr for TracePath {
    type Err = TokenTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }

        let segments: Vec<&str> = s.split('/').collect();
        if segments.len() % 2 != 0 {
            return Err(TokenTransferError::InvalidTraceLength {
                len: segments.len() as u64,
            });
        }

        segments
            .chunks_exact(2)
            .enumerate()
            .map(|(pos, hop)| {
                let pos = pos as u64;
                let port_id = hop[0].parse().map_err(|validation_error| {
                    TokenTransferError::InvalidTracePortId {
                        pos,
                        validation_error,
                    }
                })?;
                let channel_id = hop[1].parse().map_err(|validation_error| {
                    TokenTransferError::InvalidTraceChannelId {
                        pos,
                        validation_error,
                    }
                })?;
                Ok(TracePrefix::new(port_id, channel_id))
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl Display for TracePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, hop) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{hop}")?;
        }
        Ok(())
    }
}

/// A base denom and the trace of hops it travelled through.
///
/// Serialized as its full path string, e.g. `transfer/channel-0/uatom`.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrefixedDenom {
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub trace_path: TracePath,
    pub base_denom: BaseDenom,
}

impl PrefixedDenom {
    pub fn remove_trace_prefix(&mut self, prefix: &TracePrefix) {
        self.trace_path.remove_prefix(prefix)
    }

    pub fn add_trace_prefix(&mut self, prefix: TracePrefix) {
        self.trace_path.add_prefix(prefix)
    }

    /// SHA-256 of the full denom path, as used in `ibc/{hash}` denoms.
    pub fn hash(&self) -> [u8; 32] {
        Sha256::digest(self.to_string().as_bytes()).into()
    }

    /// The denom under which a bank module holds this token.
    ///
    /// Native tokens keep their base denom; vouchers are named
    /// `ibc/{HASH}` with the upper-case hex SHA-256 of the full path.
    pub fn ibc_denom(&self) -> String {
        if self.trace_path.is_empty() {
            return self.base_denom.to_string();
        }
        format!("{IBC_DENOM_PREFIX}/{}", hex::encode_upper(self.hash()))
    }
}

/// Whether the chain sending over `source_port/source_channel` escrows the
/// token rather than burning it.
///
/// "Source" is about custody, not creation: the sender is the source of any
/// token that did not arrive through the very channel it now leaves by, even
/// one minted elsewhere.
pub fn is_sender_chain_source(
    source_port: &PortId,
    source_channel: &ChannelId,
    denom: &PrefixedDenom,
) -> bool {
    !is_receiver_chain_source(source_port, source_channel, denom)
}

/// Whether a token sent over `source_port/source_channel` returns to the
/// chain that escrowed it: its most recent hop is that very channel end.
pub fn is_receiver_chain_source(
    source_port: &PortId,
    source_channel: &ChannelId,
    denom: &PrefixedDenom,
) -> bool {
    let prefix = TracePrefix::new(source_port.clone(), source_channel.clone());
    denom.trace_path.starts_with(&prefix)
}

/// Lenient parsing: leading hops are taken while they parse, the rest is the
/// base denom. `transfer/channel-75/factory/osmo1.../dust` has one hop.
impl FromStr for PrefixedDenom {
    type Err = TokenTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hops = Vec::new();
        let mut rest = s;

        while let Some((port, after_port)) = rest.split_once('/') {
            let Some((channel, after_channel)) = after_port.split_once('/') else {
                break;
            };
            let Some(hop) = TracePrefix::parse(port, channel) else {
                break;
            };
            hops.push(hop);
            rest = after_channel;
        }

        Ok(Self {
            trace_path: TracePath::new(hops),
            base_denom: rest.parse()?,
        })
    }
}

impl TryFrom<String> for PrefixedDenom {
    type Error = TokenTransferError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PrefixedDenom> for String {
    fn from(value: PrefixedDenom) -> Self {
        value.to_string()
    }
}

impl From<BaseDenom> for PrefixedDenom {
    fn from(base_denom: BaseDenom) -> Self {
        Self {
            trace_path: TracePath::empty(),
            base_denom,
        }
    }
}

impl Display for PrefixedDenom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.trace_path.is_empty() {
            write!(f, "{}", self.base_denom)
        } else {
            write!(f, "{}/{}", self.trace_path, self.base_denom)
        }
    }
}
