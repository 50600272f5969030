//! Acknowledgements written by the receiving chain.
use core::fmt::{self, Display, Formatter};

use super::error::PacketError;

/// Raw acknowledgement bytes. Never empty: an empty acknowledgement means
/// the module writes one later.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Into, serde::Serialize, serde::Deserialize)]
pub struct Acknowledgement(Vec<u8>);

impl Acknowledgement {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes the JSON `{"result":..}` / `{"error":..}` envelope. `None`
    /// for any other payload.
    pub fn status(&self) -> Option<AcknowledgementStatus> {
        serde_json::from_slice(&self.0).ok()
    }

    pub fn is_successful(&self) -> bool {
        matches!(self.status(), Some(AcknowledgementStatus::Success(_)))
    }
}

impl AsRef<[u8]> for Acknowledgement {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Acknowledgement {
    type Error = PacketError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        match bytes.is_empty() {
            true => Err(PacketError::InvalidAcknowledgement),
            false => Ok(Self(bytes)),
        }
    }
}

impl From<AcknowledgementStatus> for Acknowledgement {
    fn from(status: AcknowledgementStatus) -> Self {
        Self(status.into())
    }
}

/// The envelope ibc-go applications agree on.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AcknowledgementStatus {
    #[serde(rename = "result")]
    Success(StatusValue),
    #[serde(rename = "error")]
    Error(StatusValue),
}

impl AcknowledgementStatus {
    pub fn success(value: StatusValue) -> Self {
        Self::Success(value)
    }

    pub fn error(value: StatusValue) -> Self {
        Self::Error(value)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    fn value(&self) -> &StatusValue {
        match self {
            Self::Success(value) | Self::Error(value) => value,
        }
    }
}

impl Display for AcknowledgementStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

impl From<AcknowledgementStatus> for Vec<u8> {
    fn from(status: AcknowledgementStatus) -> Self {
        let (key, value) = match &status {
            AcknowledgementStatus::Success(v) => ("result", v.as_str()),
            AcknowledgementStatus::Error(v) => ("error", v.as_str()),
        };
        let mut envelope = serde_json::Map::new();
        envelope.insert(key.to_owned(), value.into());
        serde_json::Value::Object(envelope).to_string().into_bytes()
    }
}

/// Non-empty payload of an [`AcknowledgementStatus`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct StatusValue(String);

impl StatusValue {
    pub fn new(value: impl ToString) -> Result<Self, PacketError> {
        Self::try_from(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StatusValue {
    type Error = PacketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(PacketError::EmptyAcknowledgementStatus);
        }
        Ok(Self(value))
    }
}

impl Display for StatusValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &str) -> StatusValue {
        StatusValue::new(s).unwrap()
    }

    #[test]
    fn envelopes_match_ibc_go() {
        let ok = AcknowledgementStatus::success(value("AQ=="));
        let failed = AcknowledgementStatus::error(value("boom \"quoted\""));

        assert_eq!(Vec::<u8>::from(ok.clone()), br#"{"result":"AQ=="}"#);
        assert_eq!(
            Vec::<u8>::from(failed.clone()),
            br#"{"error":"boom \"quoted\""}"#
        );
        assert_eq!(Acknowledgement::from(ok.clone()).status(), Some(ok));
        assert_eq!(Acknowledgement::from(failed.clone()).status(), Some(failed));
    }

    #[test]
    fn emptiness_is_rejected_everywhere() {
        assert_eq!(
            StatusValue::new(""),
            Err(PacketError::EmptyAcknowledgementStatus)
        );
        assert_eq!(
            Acknowledgement::try_from(Vec::new()),
            Err(PacketError::InvalidAcknowledgement)
        );
        let empty_error = Acknowledgement::try_from(br#"{"error":""}"#.to_vec()).unwrap();
        assert_eq!(empty_error.status(), None);
    }

    #[test]
    fn foreign_payloads_have_no_status() {
        let ack = Acknowledgement::try_from(vec![1]).unwrap();
        assert_eq!(ack.status(), None);
        assert!(!ack.is_successful());
    }
}
