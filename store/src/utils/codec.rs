use core::fmt::Display;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Byte encoding of the values held by a [`TypedStore`](crate::types::TypedStore).
///
/// Failures carry a human-readable reason, surfaced in
/// [`StoreError`](crate::StoreError) together with the offending key.
pub trait Codec {
    type Value;

    fn encode(value: &Self::Value) -> Result<Vec<u8>, String>;

    fn decode(bytes: &[u8]) -> Result<Self::Value, String>;
}

/// JSON text, through `serde_json`.
#[derive(Clone, Debug)]
pub struct JsonCodec<T>(PhantomData<T>);

impl<T> Codec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Value = T;

    fn encode(value: &T) -> Result<Vec<u8>, String> {
        serde_json::to_vec(value).map_err(|e| e.to_string())
    }

    fn decode(bytes: &[u8]) -> Result<T, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}

/// Protobuf through the raw `prost` message `R` of the domain type `T`.
///
/// Decoding runs the domain validation of `TryFrom<R>`, so a stored value
/// that no longer validates is reported rather than returned.
#[derive(Clone, Debug)]
pub struct ProtobufCodec<T, R> {
    domain_type: PhantomData<T>,
    raw_type: PhantomData<R>,
}

impl<T, R> Codec for ProtobufCodec<T, R>
where
    T: Into<R> + Clone,
    R: TryInto<T> + Default + prost::Message,
    <R as TryInto<T>>::Error: Display,
{
    type Value = T;

    fn encode(value: &T) -> Result<Vec<u8>, String> {
        let raw: R = value.clone().into();
        Ok(raw.encode_to_vec())
    }

    fn decode(bytes: &[u8]) -> Result<T, String> {
        let raw = R::decode(bytes).map_err(|e| e.to_string())?;
        raw.try_into().map_err(|e| e.to_string())
    }
}

/// Raw bytes, for values that already are byte strings.
#[derive(Clone, Debug)]
pub struct BinCodec<T>(PhantomData<T>);

impl<T> Codec for BinCodec<T>
where
    T: AsRef<[u8]> + From<Vec<u8>>,
{
    type Value = T;

    fn encode(value: &T) -> Result<Vec<u8>, String> {
        Ok(value.as_ref().to_vec())
    }

    fn decode(bytes: &[u8]) -> Result<T, String> {
        Ok(bytes.to_vec().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_decode_failures_explain_themselves() {
        let reason = JsonCodec::<u64>::decode(b"\"seven\"").unwrap_err();
        assert!(reason.contains("invalid type"));
    }

    #[test]
    fn protobuf_decode_runs_domain_validation() {
        #[derive(Clone, PartialEq, ::prost::Message)]
        struct RawName {
            #[prost(string, tag = "1")]
            value: String,
        }

        #[derive(Clone, Debug, PartialEq)]
        struct Name(String);

        impl From<Name> for RawName {
            fn from(name: Name) -> Self {
                Self { value: name.0 }
            }
        }

        impl TryFrom<RawName> for Name {
            type Error = String;

            fn try_from(raw: RawName) -> Result<Self, String> {
                if raw.value.is_empty() {
                    return Err("empty name".to_string());
                }
                Ok(Self(raw.value))
            }
        }

        type C = ProtobufCodec<Name, RawName>;
        let bytes = C::encode(&Name("pica".to_string())).unwrap();
        assert_eq!(C::decode(&bytes).unwrap(), Name("pica".to_string()));

        let empty = C::encode(&Name(String::new())).unwrap();
        assert_eq!(C::decode(&empty).unwrap_err(), "empty name");
    }
}
