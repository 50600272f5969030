use core::fmt;

use serde_json::Value;

/// Memo of an ICS-20 packet.
///
/// Free text as far as the transfer itself goes. Middleware reads JSON
/// instructions out of it: `forward` for packet forwarding, `priority` for
/// the bridge fee surcharge.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Memo(String);

impl Memo {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Top-level `key` of a memo holding a JSON object. `None` for plain
    /// text memos and missing keys alike.
    pub fn json_field(&self, key: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(&self.0) {
            Ok(Value::Object(mut fields)) => fields.remove(key),
            _ => None,
        }
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Memo {
    fn from(memo: String) -> Self {
        Self(memo)
    }
}

impl From<&str> for Memo {
    fn from(memo: &str) -> Self {
        Self(memo.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_fields_are_read_from_objects_only() {
        let memo = Memo::from(r#"{"priority":"high","forward":null}"#);
        assert_eq!(memo.json_field("priority"), Some(json!("high")));
        assert_eq!(memo.json_field("forward"), Some(Value::Null));
        assert_eq!(memo.json_field("next"), None);

        assert_eq!(Memo::from(r#"["priority"]"#).json_field("priority"), None);
        assert_eq!(Memo::from("priority").json_field("priority"), None);
    }
}
