use core::time::Duration;

use centauri_ibc_core::host::identifiers::{PortId, Sequence};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_transfer_middleware::query::{
    query_fee_config_by_channel_and_denom, QueryFeeConfigByChannelAndDenomRequest,
};
use centauri_ibc_transfer_middleware::types::{ChannelFee, Params};
use centauri_ibc_transfer_middleware::FeeError;
use centauri_packet_forward::types::error::PacketForwardError;
use centauri_testkit::relayer::RelayerError;
use centauri_transfer_types::RawCoin;
use rstest::rstest;
use tests_integration::{
    amount, channel_fee, ibc_denom, set_bridge_fees, transfer, with_priority_fee, Network,
    CHAIN_A, CHAIN_B, CHAIN_C,
};

const TWO_DAYS_NANOS: i64 = 2 * 86_400 * 1_000_000_000;

/// `B` charges `10 + 1%` on `ppica` leaving through its channel to `C`.
fn network_with(fee: impl FnOnce(ChannelFee) -> ChannelFee) -> (Network, Signer, Signer) {
    let mut network = Network::new();
    let alice = network.account(CHAIN_B, "alice");
    network.fund(CHAIN_B, &alice, "ppica", 1000);
    let fee_address = network.account(CHAIN_B, "bridge-fees");

    let b_to_c = network.b_to_c.clone();
    set_bridge_fees(
        &mut network,
        CHAIN_B,
        vec![fee(channel_fee(&b_to_c, "ppica", &fee_address, 10, 100))],
    );
    (network, alice, fee_address)
}

fn send_to_carol(
    network: &mut Network,
    alice: &Signer,
    value: u64,
    memo: &str,
) -> Result<Option<Sequence>, RelayerError> {
    let msg = transfer(&network.b_to_c, "ppica", value, alice, "osmo1carol", memo);
    network.coordinator.send_transfer_with_fee(CHAIN_B, msg)
}

#[test_log::test]
fn bridge_fee_is_paid_before_the_transfer_is_sent() {
    let (mut network, alice, fee_address) = network_with(|fee| fee);

    let sequence = send_to_carol(&mut network, &alice, 1000, "")
        .unwrap()
        .expect("something is left to send");

    // 10 + (1000 - 10) / 100
    let b = network.chain(CHAIN_B);
    assert_eq!(b.balance(&alice, "ppica"), amount(0));
    assert_eq!(b.balance(&fee_address, "ppica"), amount(19));
    assert_eq!(
        b.fee_keeper()
            .sequence_fee(&PortId::transfer(), &network.b_to_c, sequence)
            .unwrap(),
        Some(RawCoin::new("ppica".to_string(), 19u64))
    );

    network.coordinator.relay_all().unwrap();
    let voucher = ibc_denom(&format!("transfer/{}/ppica", network.c_to_b));
    assert_eq!(
        network.balance(CHAIN_C, &"osmo1carol".into(), &voucher),
        amount(981)
    );
}

#[test_log::test]
fn acknowledged_transfer_keeps_its_fee_and_clears_the_record() {
    let (mut network, alice, fee_address) = network_with(|fee| fee);
    send_to_carol(&mut network, &alice, 1000, "").unwrap().unwrap();

    network.coordinator.relay_all().unwrap();

    let b = network.chain(CHAIN_B);
    assert_eq!(b.pending_commitments(), 0);
    assert_eq!(b.fee_keeper().pending_sequence_fees().unwrap(), 0);
    assert_eq!(b.balance(&fee_address, "ppica"), amount(19));
    assert_eq!(b.balance(&alice, "ppica"), amount(0));
}

#[test_log::test]
fn timed_out_transfer_returns_the_fee_to_the_sender() {
    let (mut network, alice, fee_address) = network_with(|fee| fee);
    send_to_carol(&mut network, &alice, 1000, "").unwrap().unwrap();

    network.coordinator.advance_time(Duration::from_secs(86_401));
    network.coordinator.relay_all().unwrap();

    let b = network.chain(CHAIN_B);
    assert_eq!(b.pending_commitments(), 0);
    assert_eq!(b.fee_keeper().pending_sequence_fees().unwrap(), 0);
    assert_eq!(b.balance(&alice, "ppica"), amount(1000));
    assert_eq!(b.balance(&fee_address, "ppica"), amount(0));
}

#[test_log::test]
fn fee_already_spent_is_returned_as_far_as_possible() {
    let (mut network, alice, fee_address) = network_with(|fee| fee);
    let treasury = network.account(CHAIN_B, "treasury");
    send_to_carol(&mut network, &alice, 1000, "").unwrap().unwrap();

    network.send(CHAIN_B, &fee_address, &treasury, "ppica", 15);

    network.coordinator.advance_time(Duration::from_secs(86_401));
    network.coordinator.relay_all().unwrap();

    let b = network.chain(CHAIN_B);
    assert_eq!(b.pending_commitments(), 0);
    assert_eq!(b.fee_keeper().pending_sequence_fees().unwrap(), 0);
    assert_eq!(b.balance(&alice, "ppica"), amount(985));
    assert_eq!(b.balance(&fee_address, "ppica"), amount(0));
}

#[test_log::test]
fn priority_named_in_the_memo_adds_its_surcharge() {
    let (mut network, alice, fee_address) =
        network_with(|fee| with_priority_fee(fee, "high", 100));

    send_to_carol(&mut network, &alice, 1000, r#"{"priority":"high"}"#)
        .unwrap()
        .unwrap();

    // 110 + (1000 - 110) / 100
    let b = network.chain(CHAIN_B);
    assert_eq!(b.balance(&fee_address, "ppica"), amount(118));
    assert_eq!(b.pending_commitments(), 1);

    network.coordinator.relay_all().unwrap();
    let voucher = ibc_denom(&format!("transfer/{}/ppica", network.c_to_b));
    assert_eq!(
        network.balance(CHAIN_C, &"osmo1carol".into(), &voucher),
        amount(882)
    );
}

#[rstest]
#[case::unknown_priority(r#"{"priority":"urgent"}"#)]
#[case::not_json("high")]
fn unknown_priorities_pay_the_minimum_fee(#[case] memo: &str) {
    let (mut network, alice, fee_address) =
        network_with(|fee| with_priority_fee(fee, "high", 100));

    send_to_carol(&mut network, &alice, 1000, memo)
        .unwrap()
        .unwrap();

    assert_eq!(
        network.balance(CHAIN_B, &fee_address, "ppica"),
        amount(19)
    );
}

#[test_log::test]
fn transfer_smaller_than_the_minimum_fee_is_swallowed() {
    let (mut network, alice, fee_address) = network_with(|fee| fee);

    assert_eq!(send_to_carol(&mut network, &alice, 5, "").unwrap(), None);

    let b = network.chain(CHAIN_B);
    assert_eq!(b.balance(&alice, "ppica"), amount(995));
    assert_eq!(b.balance(&fee_address, "ppica"), amount(5));
    assert_eq!(b.pending_commitments(), 0);
}

#[test_log::test]
fn short_timeouts_are_rejected_on_channels_with_a_minimum() {
    let (mut network, alice, fee_address) = network_with(|fee| ChannelFee {
        min_timeout_timestamp: TWO_DAYS_NANOS,
        ..fee
    });

    // the default transfer times out a day after genesis
    let err = send_to_carol(&mut network, &alice, 1000, "").unwrap_err();
    assert!(matches!(err, RelayerError::Fee(FeeError::TimeoutTooSoon)));

    network.coordinator.advance_time(Duration::from_secs(2 * 86_400));
    let err = send_to_carol(&mut network, &alice, 1000, "").unwrap_err();
    assert!(matches!(err, RelayerError::Fee(FeeError::TimeoutInPast)));

    let b = network.chain(CHAIN_B);
    assert_eq!(b.balance(&alice, "ppica"), amount(1000));
    assert_eq!(b.balance(&fee_address, "ppica"), amount(0));
}

#[test_log::test]
fn tokens_missing_from_the_channel_config_cannot_leave() {
    let (mut network, alice, _) = network_with(|fee| fee);
    network.fund(CHAIN_B, &alice, "uosmo", 1000);

    let msg = transfer(&network.b_to_c, "uosmo", 1000, &alice, "osmo1carol", "");
    let err = network
        .coordinator
        .send_transfer_with_fee(CHAIN_B, msg)
        .unwrap_err();

    assert!(matches!(err, RelayerError::Fee(FeeError::TokenNotAllowed)));
    assert_eq!(
        network.balance(CHAIN_B, &alice, "uosmo"),
        amount(1000)
    );
}

#[test_log::test]
fn channels_without_fee_config_send_the_full_amount() {
    let (mut network, alice, fee_address) = network_with(|fee| fee);

    let msg = transfer(&network.b_to_a, "ppica", 1000, &alice, "cosmos1bob", "");
    let sequence = network
        .coordinator
        .send_transfer_with_fee(CHAIN_B, msg)
        .unwrap()
        .unwrap();

    let b = network.chain(CHAIN_B);
    assert_eq!(b.balance(&fee_address, "ppica"), amount(0));
    assert_eq!(
        b.fee_keeper()
            .sequence_fee(&PortId::transfer(), &network.b_to_a, sequence)
            .unwrap(),
        None
    );

    network.coordinator.relay_all().unwrap();
    let voucher = ibc_denom(&format!("transfer/{}/ppica", network.a_to_b));
    assert_eq!(
        network.balance(CHAIN_A, &"cosmos1bob".into(), &voucher),
        amount(1000)
    );
}

#[test_log::test]
fn fee_schedule_is_queryable_by_channel_and_denom() {
    let (network, _, _) = network_with(|fee| with_priority_fee(fee, "high", 100));
    let keeper = network.chain(CHAIN_B).fee_keeper();

    let response = query_fee_config_by_channel_and_denom(
        keeper,
        &QueryFeeConfigByChannelAndDenomRequest {
            channel: network.b_to_c.clone(),
            denom: "ppica".to_string(),
        },
    )
    .unwrap();
    assert_eq!(response.fees.percentage, 100);
    assert_eq!(response.fees.tx_priority_fee.len(), 1);

    let err = query_fee_config_by_channel_and_denom(
        keeper,
        &QueryFeeConfigByChannelAndDenomRequest {
            channel: network.b_to_a.clone(),
            denom: "ppica".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, FeeError::FeeConfigNotFound { .. }));
}

#[test_log::test]
fn only_the_authority_changes_fee_params() {
    let mut network = Network::new();
    let mallory = network.account(CHAIN_B, "mallory");
    let chain = network.chain_mut(CHAIN_B);

    let err = chain
        .fee_keeper_mut()
        .set_params(
            &mallory,
            Params {
                channel_fees: Vec::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, FeeError::Unauthorized { .. }));

    let err = chain
        .forward_keeper_mut()
        .set_params(&mallory, Default::default())
        .unwrap_err();
    assert!(matches!(err, PacketForwardError::Unauthorized { .. }));
}

#[test_log::test]
fn bridge_fee_of_a_swallowed_transfer_is_not_recorded() {
    let (mut network, alice, _) = network_with(|fee| fee);
    send_to_carol(&mut network, &alice, 10, "").unwrap();

    assert_eq!(
        network
            .chain(CHAIN_B)
            .fee_keeper()
            .sequence_fee(&PortId::transfer(), &network.b_to_c, Sequence::from(1))
            .unwrap(),
        None
    );
    // the next transfer on the channel still gets the first sequence
    let sequence = send_to_carol(&mut network, &alice, 500, "")
        .unwrap()
        .unwrap();
    assert_eq!(sequence, Sequence::from(1));
}
