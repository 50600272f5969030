//! Intermediate accounts receiving the funds of forwarded packets.

use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_primitives::Signer;
use sha2::{Digest, Sha256};
use subtle_encoding::bech32;

use crate::MODULE_NAME;

/// Length of a cosmos account address.
const ADDRESS_LEN: usize = 20;

/// Cosmos ADR-028 module-derived hash: `sha256(sha256(typ) || key)`.
fn address_hash(typ: &str, key: &[u8]) -> [u8; 32] {
    let type_hash = Sha256::digest(typ.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(type_hash);
    hasher.update(key);
    hasher.finalize().into()
}

/// Account that receives a forwarded packet on this chain instead of the
/// receiver named in the packet.
///
/// It is derived from the arrival channel and the original sender so that
/// no sender can route funds through an account it does not control.
pub fn derive_override_receiver(
    channel: &ChannelId,
    original_sender: &Signer,
    bech32_prefix: &str,
) -> Signer {
    let key = format!("{channel}/{original_sender}");
    let hash = address_hash(MODULE_NAME, key.as_bytes());
    Signer::from(bech32::encode(bech32_prefix, &hash[..ADDRESS_LEN]))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    const SENDER: &str = "cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng";

    #[rstest]
    #[case(0, SENDER, "centauri", "centauri1vwmg3w0sug4c72hgpd0apx62kcvzz02rrfgkkp")]
    #[case(1, SENDER, "centauri", "centauri1lmsprccdzezhes25pd3avfd590k5g5ap3vtwv8")]
    #[case(0, "osmo1sender", "osmo", "osmo1r2ayk9zysq86jvshs2fdn043kje8wlaz2e8u82")]
    fn derived_addresses(
        #[case] channel: u64,
        #[case] sender: &str,
        #[case] prefix: &str,
        #[case] expected: &str,
    ) {
        let receiver = derive_override_receiver(&ChannelId::new(channel), &sender.into(), prefix);
        assert_eq!(receiver.as_ref(), expected);
    }

    #[test]
    fn derivation_is_deterministic_and_input_sensitive() {
        let channel = ChannelId::new(4);
        let first = derive_override_receiver(&channel, &SENDER.into(), "centauri");
        let second = derive_override_receiver(&channel, &SENDER.into(), "centauri");
        assert_eq!(first, second);

        let other_sender = derive_override_receiver(&channel, &"cosmos1other".into(), "centauri");
        let other_channel = derive_override_receiver(&ChannelId::new(5), &SENDER.into(), "centauri");
        assert_ne!(first, other_sender);
        assert_ne!(first, other_channel);
        assert_ne!(other_sender, other_channel);
    }

    #[test]
    fn distinct_channel_and_sender_pairs_never_share_a_receiver() {
        let senders: Vec<Signer> = (0..40)
            .map(|i| Signer::from(format!("cosmos1sender{i}")))
            .collect();

        let receivers: HashSet<String> = (0..25)
            .flat_map(|channel| {
                senders.iter().map(move |sender| {
                    derive_override_receiver(&ChannelId::new(channel), sender, "centauri")
                        .as_ref()
                        .to_string()
                })
            })
            .collect();

        assert_eq!(receivers.len(), 1000);
        assert!(receivers.iter().all(|receiver| receiver.starts_with("centauri1")));
    }
}
