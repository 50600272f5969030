/// An account address as it appears in messages and packet data. Kept as
/// text: the bech32 prefix belongs to whichever chain the address lives on,
/// so no decoding happens here.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Signer(String);

impl Signer {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Signer {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}

impl AsRef<str> for Signer {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_stay_verbatim() {
        let signer = Signer::from("centauri1abc");
        assert_eq!(signer.to_string(), "centauri1abc");
        assert_eq!(serde_json::to_string(&signer).unwrap(), r#""centauri1abc""#);
        assert!(Signer::default().is_empty());
        assert_eq!(Signer::from(String::from("osmo1x")).as_ref(), "osmo1x");
    }
}
