//! ICS-24 identifier rules.
use core::ops::RangeInclusive;

use crate::host::error::IdentifierError;
use crate::host::identifiers::ChannelId;

/// Characters allowed besides ASCII letters and digits.
const SPECIAL_CHARS: &[char] = &['.', '_', '+', '-', '#', '[', ']', '<', '>'];

const PORT_ID_LENGTH: RangeInclusive<usize> = 2..=128;
const CHANNEL_ID_LENGTH: RangeInclusive<usize> = 8..=64;

pub fn validate_identifier_chars(id: &str) -> Result<(), IdentifierError> {
    let valid = |c: char| c.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(&c);
    match id.chars().find(|c| !valid(*c)) {
        None => Ok(()),
        Some(_) => Err(IdentifierError::InvalidCharacter { id: id.into() }),
    }
}

/// Empty identifiers are always rejected, whatever `bounds` allows.
pub fn validate_identifier_length(
    id: &str,
    bounds: RangeInclusive<usize>,
) -> Result<(), IdentifierError> {
    let min = (*bounds.start()).max(1);
    let max = *bounds.end();
    if (min..=max).contains(&id.len()) {
        return Ok(());
    }
    Err(IdentifierError::InvalidLength {
        id: id.into(),
        min: min as u64,
        max: max as u64,
    })
}

/// Checks `id` reads `{name}-{n}` with `n` a canonical decimal `u64`, so
/// `channel-7` passes and `channel-07` does not.
pub fn validate_named_u64_index(id: &str, name: &str) -> Result<(), IdentifierError> {
    let canonical = id
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|index| index.parse::<u64>().ok().map(|n| n.to_string() == index))
        .unwrap_or(false);

    if canonical {
        Ok(())
    } else {
        Err(IdentifierError::InvalidPrefix { prefix: id.into() })
    }
}

pub fn validate_port_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, PORT_ID_LENGTH)
}

pub fn validate_channel_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, CHANNEL_ID_LENGTH)?;
    validate_named_u64_index(id, ChannelId::prefix())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::lowest("channel-0", true)]
    #[case::u64_max("channel-18446744073709551615", true)]
    #[case::leading_zero("channel-01", false)]
    #[case::no_index("channel-", false)]
    #[case::no_dash("channel0", false)]
    #[case::other_name("chan-1", false)]
    #[case::past_u64("channel-18446744073709551616", false)]
    #[case::signed("channel-+1", false)]
    #[case::empty("", false)]
    fn channel_identifiers(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_channel_identifier(id).is_ok(), ok, "{id}");
    }

    #[rstest]
    #[case::transfer("transfer", true)]
    #[case::wasm_contract("wasm.centauri1abc", true)]
    #[case::shortest("tx", true)]
    #[case::too_short("t", false)]
    #[case::space("tr ansfer", false)]
    #[case::slash("trans/fer", false)]
    #[case::non_ascii("transfér", false)]
    fn port_identifiers(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_port_identifier(id).is_ok(), ok, "{id}");
    }

    #[test]
    fn length_errors_name_the_bounds() {
        let err = validate_port_identifier(&"a".repeat(129)).unwrap_err();
        assert_eq!(
            err,
            IdentifierError::InvalidLength {
                id: "a".repeat(129),
                min: 2,
                max: 128,
            }
        );
    }
}
