//! Denomination a received token has on this chain.

use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_transfer_types::{is_receiver_chain_source, PrefixedDenom, TracePrefix};

/// Full trace of `denom`, as found in a packet sent from
/// `source_port/source_channel` to `dest_port/dest_channel`, once it lands
/// on this chain.
///
/// A token coming back over the channel it left through loses that hop,
/// any other token gains the arrival hop.
pub fn prefixed_denom_for_this_chain(
    dest_port: &PortId,
    dest_channel: &ChannelId,
    source_port: &PortId,
    source_channel: &ChannelId,
    denom: &PrefixedDenom,
) -> PrefixedDenom {
    let mut denom = denom.clone();
    if is_receiver_chain_source(source_port, source_channel, &denom) {
        denom.remove_trace_prefix(&TracePrefix::new(
            source_port.clone(),
            source_channel.clone(),
        ));
    } else {
        denom.add_trace_prefix(TracePrefix::new(dest_port.clone(), dest_channel.clone()));
    }
    denom
}

/// On-chain denom of `denom` once received here: the bare base denom when
/// no trace is left, `ibc/{HASH}` otherwise.
///
/// `denom` is the packet denom as written by the sender. A denom without a
/// base (e.g. an empty string) is returned unchanged.
pub fn denom_for_this_chain(
    dest_port: &PortId,
    dest_channel: &ChannelId,
    source_port: &PortId,
    source_channel: &ChannelId,
    denom: &str,
) -> String {
    match denom.parse::<PrefixedDenom>() {
        Ok(parsed) => prefixed_denom_for_this_chain(
            dest_port,
            dest_channel,
            source_port,
            source_channel,
            &parsed,
        )
        .ibc_denom(),
        Err(_) => denom.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn transfer() -> PortId {
        PortId::transfer()
    }

    #[rstest]
    #[case("uatom")]
    #[case("transfer/channel-7/uosmo")]
    #[case("transfer/channel-7/transfer/channel-12/ppica")]
    fn wrapping_then_unwinding_over_the_same_channel_restores_the_denom(#[case] denom: &str) {
        let original: PrefixedDenom = denom.parse().unwrap();
        let channel = ChannelId::new(3);
        let counterparty = ChannelId::new(9);

        // the token arrives here over channel-3 and gains the hop
        let wrapped = prefixed_denom_for_this_chain(
            &transfer(),
            &channel,
            &transfer(),
            &counterparty,
            &original,
        );
        assert_eq!(wrapped.to_string(), format!("transfer/channel-3/{denom}"));

        // back on the counterparty, arriving over channel-9 from channel-3
        let unwound = prefixed_denom_for_this_chain(
            &transfer(),
            &counterparty,
            &transfer(),
            &channel,
            &wrapped,
        );
        assert_eq!(unwound, original);
    }

    #[test]
    fn returning_native_token_is_bare() {
        let denom = denom_for_this_chain(
            &transfer(),
            &ChannelId::new(0),
            &transfer(),
            &ChannelId::new(5),
            "transfer/channel-5/ppica",
        );
        assert_eq!(denom, "ppica");
    }

    #[test]
    fn returning_voucher_keeps_its_hash() {
        let denom = denom_for_this_chain(
            &transfer(),
            &ChannelId::new(0),
            &transfer(),
            &ChannelId::new(5),
            "transfer/channel-5/transfer/channel-1/uatom",
        );
        let expected: PrefixedDenom = "transfer/channel-1/uatom".parse().unwrap();
        assert_eq!(denom, expected.ibc_denom());
        assert!(denom.starts_with("ibc/"));
    }

    #[test]
    fn foreign_token_gains_the_arrival_hop() {
        let denom = denom_for_this_chain(
            &transfer(),
            &ChannelId::new(0),
            &transfer(),
            &ChannelId::new(5),
            "uatom",
        );
        let expected: PrefixedDenom = "transfer/channel-0/uatom".parse().unwrap();
        assert_eq!(denom, expected.ibc_denom());
    }
}
