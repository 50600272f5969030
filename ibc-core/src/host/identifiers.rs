//! Port and channel identifiers plus packet sequences.
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::host::error::IdentifierError;
use crate::host::validate::{validate_channel_identifier, validate_port_identifier};

/// Declares a validated string identifier. Values only come out of
/// `FromStr` or the type's own constructors, so holding one means it passed
/// `$validate`.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $validate:path) => {
        $(#[$meta])*
        #[cfg_attr(
            feature = "borsh",
            derive(borsh::BorshSerialize, borsh::BorshDeserialize)
        )]
        #[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
        #[derive(
            Clone,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            derive_more::Into,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(try_from = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $validate(s)?;
                Ok(Self(s.to_owned()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                $validate(&s)?;
                Ok(Self(s))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_identifier!(
    /// Port identifier, e.g. `transfer`.
    PortId,
    validate_port_identifier
);

string_identifier!(
    /// Channel identifier, always `channel-{n}`.
    ChannelId,
    validate_channel_identifier
);

impl PortId {
    /// The port ICS-20 binds to.
    pub fn transfer() -> Self {
        Self("transfer".to_owned())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::transfer()
    }
}

impl ChannelId {
    /// ```
    /// # use centauri_ibc_core::host::identifiers::ChannelId;
    /// assert_eq!(ChannelId::new(27).to_string(), "channel-27");
    /// ```
    pub fn new(index: u64) -> Self {
        Self(format!("{}-{index}", Self::prefix()))
    }

    pub fn prefix() -> &'static str {
        "channel"
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Position of a packet in the stream a channel end sends.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::From,
    derive_more::Into,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn increment(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Big-endian, so store keys built from sequences sort numerically.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl FromStr for Sequence {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self).map_err(|e: core::num::ParseIntError| {
            IdentifierError::FailedToParse {
                value: s.to_owned(),
                description: e.to_string(),
            }
        })
    }
}
