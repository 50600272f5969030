//! Failures of the fungible token transfer application.
use core::convert::Infallible;

use centauri_ibc_core::channel::{ChannelError, PacketError, StatusValue};
use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_ibc_core::host::IdentifierError;
use displaydoc::Display;
use uint::FromDecStrErr;

#[derive(Display, Debug)]
pub enum TokenTransferError {
    /// channel error: `{0}`
    Channel(ChannelError),
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// insufficient funds: tried to send `{send_attempt}`, sender only has `{available_funds}`
    InsufficientFunds {
        send_attempt: String,
        available_funds: String,
    },
    /// no counterparty known for `{port_id}/{channel_id}`
    DestinationChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// base denomination is empty
    EmptyBaseDenom,
    /// trace hop `{pos}` has an invalid port: `{validation_error}`
    InvalidTracePortId {
        pos: u64,
        validation_error: IdentifierError,
    },
    /// trace hop `{pos}` has an invalid channel: `{validation_error}`
    InvalidTraceChannelId {
        pos: u64,
        validation_error: IdentifierError,
    },
    /// trace path has an odd number of segments: `{len}`
    InvalidTraceLength { len: u64 },
    /// invalid amount: `{0}`
    InvalidAmount(FromDecStrErr),
    /// amount overflow while crediting `{denom}`
    AmountOverflow { denom: String },
    /// transfer amount must be positive
    ZeroAmount,
    /// sender and receiver addresses must not be empty
    EmptyAddress,
    /// failed to deserialize packet data
    PacketDataDeserialization,
    /// failed to deserialize acknowledgement
    AckDeserialization,
    /// other error: `{0}`
    Other(String),
}

impl std::error::Error for TokenTransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Channel(e) => Some(e),
            Self::InvalidIdentifier(e)
            | Self::InvalidTracePortId {
                validation_error: e,
                ..
            }
            | Self::InvalidTraceChannelId {
                validation_error: e,
                ..
            } => Some(e),
            Self::InvalidAmount(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Infallible> for TokenTransferError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

impl From<ChannelError> for TokenTransferError {
    fn from(err: ChannelError) -> Self {
        Self::Channel(err)
    }
}

impl From<IdentifierError> for TokenTransferError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

/// Channel failures keep their kind; anything else is the application's own
/// failure.
impl From<TokenTransferError> for PacketError {
    fn from(err: TokenTransferError) -> Self {
        match err {
            TokenTransferError::Channel(e) => Self::Channel(e),
            other => Self::AppModule {
                description: other.to_string(),
            },
        }
    }
}

/// Error acknowledgements carry the rendered message.
impl From<TokenTransferError> for StatusValue {
    fn from(err: TokenTransferError) -> Self {
        // every variant renders a non-empty message
        StatusValue::new(err.to_string()).expect("error message must not be empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_names_both_amounts() {
        let err = TokenTransferError::InsufficientFunds {
            send_attempt: "1000ppica".to_string(),
            available_funds: "5ppica".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: tried to send `1000ppica`, sender only has `5ppica`"
        );
    }

    #[test]
    fn application_failures_become_app_module_packet_errors() {
        let err = PacketError::from(TokenTransferError::ZeroAmount);
        assert!(matches!(
            err,
            PacketError::AppModule { description } if description == "transfer amount must be positive"
        ));
    }
}
