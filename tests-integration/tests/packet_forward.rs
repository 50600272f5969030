use core::time::Duration;

use base64::Engine;
use centauri_ibc_core::channel::{Acknowledgement, AcknowledgementStatus};
use centauri_ibc_core::host::identifiers::{PortId, Sequence};
use centauri_ibc_core::primitives::Signer;
use centauri_packet_forward::types::config::ForwardConfig;
use centauri_packet_forward::types::params::Params;
use centauri_packet_forward::types::receiver::derive_override_receiver;
use centauri_packet_forward::ForwardFlags;
use centauri_testkit::fixtures::ForwardMemoConfig;
use centauri_testkit::relayer::RelayEvent;
use centauri_transfer_types::Amount;
use rstest::rstest;
use tests_integration::{
    amount, channel_fee, ibc_denom, set_bridge_fees, transfer, Network, CHAIN_A, CHAIN_B, CHAIN_C,
};

const CAROL: &str = "osmo1carol";

/// A memo `C` rejects: its forward has no receiver.
const REJECTED_BY_C: &str =
    r#"{"forward":{"receiver":"","port":"transfer","channel":"channel-7"}}"#;

/// A network where `B` takes a 5% protocol fee and a bridge fee of
/// `10 + 1%` on its channel to `C`.
struct Forwarding {
    network: Network,
    /// Token alice sends from `A`, and how much of it.
    denom: &'static str,
    sent: u64,
    alice: Signer,
    /// Account holding the funds on `B` while they are forwarded.
    override_receiver: Signer,
    fee_address: Signer,
    /// `denom` on `B`.
    voucher_b: String,
    /// `denom` on `C`.
    voucher_c: String,
}

impl Forwarding {
    /// Alice sends 1000 uatom.
    fn new() -> Self {
        Self::with_config(ForwardConfig::default())
    }

    fn with_config(config: ForwardConfig) -> Self {
        Self::sending("uatom", 1000, config)
    }

    fn sending(denom: &'static str, sent: u64, config: ForwardConfig) -> Self {
        let mut network = Network::with_config(config);
        let alice = network.account(CHAIN_A, "alice");
        network.fund(CHAIN_A, &alice, denom, sent);

        let voucher_b = ibc_denom(&format!("transfer/{}/{denom}", network.b_to_a));
        let voucher_c = ibc_denom(&format!(
            "transfer/{}/transfer/{}/{denom}",
            network.c_to_b, network.b_to_a
        ));
        let override_receiver = derive_override_receiver(&network.b_to_a, &alice, "centauri");
        let fee_address = network.account(CHAIN_B, "bridge-fees");

        let b_to_c = network.b_to_c.clone();
        set_bridge_fees(
            &mut network,
            CHAIN_B,
            vec![channel_fee(&b_to_c, &voucher_b, &fee_address, 10, 100)],
        );
        set_protocol_fee(&mut network, "0.05");

        Self {
            network,
            denom,
            sent,
            alice,
            override_receiver,
            fee_address,
            voucher_b,
            voucher_c,
        }
    }

    /// Sends alice's tokens from `A` to `B` with `memo`.
    fn send(&mut self, memo: impl Into<String>) -> Sequence {
        let bob = self.network.account(CHAIN_B, "bob");
        let msg = transfer(&self.network.a_to_b, self.denom, self.sent, &self.alice, bob, memo);
        self.network
            .coordinator
            .send_transfer(CHAIN_A, msg)
            .unwrap()
    }

    fn forward_to_carol(&self) -> String {
        ForwardMemoConfig::builder()
            .receiver(CAROL)
            .channel(self.network.b_to_c.clone())
            .build()
    }

    fn b_balance(&self, account: &Signer) -> Amount {
        self.network.chain(CHAIN_B).balance(account, &self.voucher_b)
    }

    fn community_pool(&self) -> Signer {
        self.network.chain(CHAIN_B).community_pool().clone()
    }

    /// Acknowledgement `B` wrote for the transfer from `A`.
    fn ack_on_b(&self, sequence: Sequence) -> Acknowledgement {
        self.network
            .chain(CHAIN_B)
            .acknowledgement(&PortId::transfer(), &self.network.b_to_a, sequence)
            .cloned()
            .expect("B acknowledged the transfer")
    }

    fn assert_settled(&self) {
        for chain_id in [CHAIN_A, CHAIN_B, CHAIN_C] {
            assert_eq!(self.network.chain(chain_id).pending_commitments(), 0);
        }
        assert!(self
            .network
            .chain(CHAIN_B)
            .in_flight_packets()
            .unwrap()
            .is_empty());
    }

    /// Nothing of the transfer is left on `B` or `C` and alice has her
    /// tokens back.
    fn assert_refunded(&self) {
        assert_eq!(
            self.network.balance(CHAIN_A, &self.alice, self.denom),
            amount(self.sent)
        );
        assert_eq!(self.b_balance(&self.override_receiver), amount(0));
        assert_eq!(self.b_balance(&self.fee_address), amount(0));
        assert_eq!(self.b_balance(&self.community_pool()), amount(0));
        assert_eq!(
            self.network.chain(CHAIN_B).bank().supply(&self.voucher_b),
            amount(0)
        );
        assert_eq!(
            self.network.balance(CHAIN_C, &CAROL.into(), &self.voucher_c),
            amount(0)
        );
        self.assert_settled();
    }
}

fn set_protocol_fee(network: &mut Network, percentage: &str) {
    let chain = network.chain_mut(CHAIN_B);
    let authority = chain.authority().clone();
    chain
        .forward_keeper_mut()
        .set_params(
            &authority,
            Params {
                fee_percentage: percentage.parse().unwrap(),
            },
        )
        .unwrap();
    chain.commit().unwrap();
}

fn ack_text(ack: &Acknowledgement) -> String {
    String::from_utf8(ack.as_bytes().to_vec()).unwrap()
}

#[test_log::test]
fn multi_hop_transfer_settles_with_exact_balances() {
    let mut setup = Forwarding::sending("stake", 1_000_000_000, ForwardConfig::default());
    let memo = setup.forward_to_carol();
    let sequence = setup.send(memo);

    let events = setup.network.coordinator.relay_all().unwrap();
    assert!(matches!(
        &events[..],
        [
            RelayEvent::Received { chain: b, acknowledgement: None, .. },
            RelayEvent::Received { chain: c, acknowledgement: Some(_), .. },
            RelayEvent::Acknowledged { chain: b_again, .. },
            RelayEvent::Acknowledged { chain: a, .. },
        ] if b == CHAIN_B && c == CHAIN_C && b_again == CHAIN_B && a == CHAIN_A
    ));

    // 1_000_000_000 - 50_000_000 protocol fee
    //   - (10 + 949_999_990 / 100) bridge fee
    let network = &setup.network;
    assert_eq!(network.balance(CHAIN_A, &setup.alice, "stake"), amount(0));
    assert_eq!(
        network.balance(
            CHAIN_A,
            &network.chain(CHAIN_A).escrow_account(&PortId::transfer(), &network.a_to_b),
            "stake"
        ),
        amount(1_000_000_000)
    );
    assert_eq!(setup.b_balance(&setup.community_pool()), amount(50_000_000));
    assert_eq!(setup.b_balance(&setup.fee_address), amount(9_500_009));
    assert_eq!(setup.b_balance(&setup.override_receiver), amount(0));
    assert_eq!(
        setup.b_balance(
            &network
                .chain(CHAIN_B)
                .escrow_account(&PortId::transfer(), &network.b_to_c)
        ),
        amount(940_499_991)
    );
    assert_eq!(
        network.balance(CHAIN_C, &CAROL.into(), &setup.voucher_c),
        amount(940_499_991)
    );

    assert!(setup.ack_on_b(sequence).is_successful());
    let b = network.chain(CHAIN_B);
    assert_eq!(b.events_of_kind("packet_forward").count(), 1);
    assert_eq!(b.events_of_kind("packet_forward_fee").count(), 2);
    assert_eq!(b.fee_keeper().pending_sequence_fees().unwrap(), 0);
    setup.assert_settled();
}

#[test_log::test]
fn error_acknowledgement_from_the_next_hop_is_passed_back() {
    let mut setup = Forwarding::new();
    let memo: String = ForwardMemoConfig::builder()
        .receiver(CAROL)
        .channel(setup.network.b_to_c.clone())
        .next(REJECTED_BY_C)
        .build();
    let sequence = setup.send(memo);

    setup.network.coordinator.relay_all().unwrap();

    let ack = setup.ack_on_b(sequence);
    assert!(!ack.is_successful());
    assert!(ack_text(&ack).contains("receiver cannot be empty"));

    let failure = setup
        .network
        .chain(CHAIN_B)
        .events_of_kind("packet_forward_failure")
        .next()
        .cloned()
        .unwrap();
    assert_eq!(failure.attribute("refunded"), Some("true"));
    setup.assert_refunded();
}

#[test_log::test]
fn forward_timing_out_without_retries_refunds_the_sender() {
    let mut setup = Forwarding::new();
    let memo = setup.forward_to_carol();
    let sequence = setup.send(memo);

    setup.network.coordinator.relay_from(CHAIN_A).unwrap();
    setup
        .network
        .coordinator
        .advance_time(Duration::from_secs(601));

    let events = setup.network.coordinator.relay_all().unwrap();
    assert!(matches!(
        &events[0],
        RelayEvent::TimedOut { chain, .. } if chain == CHAIN_B
    ));

    let ack = setup.ack_on_b(sequence);
    assert_eq!(
        ack_text(&ack),
        r#"{"error":"packet-forward-middleware error: forwarded packet timed out"}"#
    );
    setup.assert_refunded();
}

#[test_log::test]
fn refund_goes_through_when_the_fee_address_spent_its_fees() {
    let mut setup = Forwarding::new();
    let memo = setup.forward_to_carol();
    let sequence = setup.send(memo);
    setup.network.coordinator.relay_from(CHAIN_A).unwrap();

    let treasury = setup.network.account(CHAIN_B, "treasury");
    let (fee_address, voucher_b) = (setup.fee_address.clone(), setup.voucher_b.clone());
    setup
        .network
        .send(CHAIN_B, &fee_address, &treasury, &voucher_b, 19);

    setup
        .network
        .coordinator
        .advance_time(Duration::from_secs(601));
    setup.network.coordinator.relay_all().unwrap();

    assert!(!setup.ack_on_b(sequence).is_successful());
    assert_eq!(
        setup.network.balance(CHAIN_A, &setup.alice, "uatom"),
        amount(1000)
    );
    // the protocol fee came back, the spent bridge fee could not
    let b = setup.network.chain(CHAIN_B);
    assert_eq!(b.events_of_kind("packet_forward_fee").count(), 3);
    assert_eq!(setup.b_balance(&setup.override_receiver), amount(0));
    assert_eq!(setup.b_balance(&setup.community_pool()), amount(0));
    assert_eq!(setup.b_balance(&treasury), amount(19));
    assert_eq!(b.bank().supply(&setup.voucher_b), amount(19));
    assert_eq!(b.fee_keeper().pending_sequence_fees().unwrap(), 0);
    setup.assert_settled();
}

#[test_log::test]
fn timed_out_forward_is_retried_without_a_second_bridge_fee() {
    let mut setup = Forwarding::new();
    let memo: String = ForwardMemoConfig::builder()
        .receiver(CAROL)
        .channel(setup.network.b_to_c.clone())
        .retries(1)
        .build();
    let sequence = setup.send(memo);

    setup.network.coordinator.relay_from(CHAIN_A).unwrap();
    setup
        .network
        .coordinator
        .advance_time(Duration::from_secs(601));
    setup.network.coordinator.relay_all().unwrap();

    let b = setup.network.chain(CHAIN_B);
    let retry = b.events_of_kind("packet_forward_retry").next().cloned().unwrap();
    assert_eq!(retry.attribute("previous_sequence"), Some("1"));
    assert_eq!(retry.attribute("sequence"), Some("2"));
    assert_eq!(retry.attribute("retries_remaining"), Some("0"));

    assert!(setup.ack_on_b(sequence).is_successful());
    assert_eq!(setup.b_balance(&setup.fee_address), amount(19));
    assert_eq!(
        setup
            .network
            .balance(CHAIN_C, &CAROL.into(), &setup.voucher_c),
        amount(931)
    );
    for sequence in [1, 2] {
        assert_eq!(
            b.fee_keeper()
                .sequence_fee(&PortId::transfer(), &setup.network.b_to_c, Sequence::from(sequence))
                .unwrap(),
            None
        );
    }
    setup.assert_settled();
}

#[test_log::test]
fn refund_timeout_caps_the_requested_forward_timeout() {
    let mut setup = Forwarding::with_config(ForwardConfig {
        refund_timeout: Duration::from_secs(60),
        ..ForwardConfig::default()
    });
    let memo: String = ForwardMemoConfig::builder()
        .receiver(CAROL)
        .channel(setup.network.b_to_c.clone())
        .timeout(Duration::from_secs(3600))
        .build();
    setup.send(memo);

    setup.network.coordinator.relay_from(CHAIN_A).unwrap();
    setup
        .network
        .coordinator
        .advance_time(Duration::from_secs(61));
    setup.network.coordinator.relay_all().unwrap();

    setup.assert_refunded();
}

#[test_log::test]
fn failure_after_the_point_of_no_return_keeps_the_funds_on_the_forwarding_chain() {
    let mut setup = Forwarding::new();
    setup.network.coordinator.set_recv_flags(
        CHAIN_B,
        ForwardFlags {
            nonrefundable: true,
            ..ForwardFlags::default()
        },
    );
    let memo: String = ForwardMemoConfig::builder()
        .receiver(CAROL)
        .channel(setup.network.b_to_c.clone())
        .next(REJECTED_BY_C)
        .build();
    let sequence = setup.send(memo);

    setup.network.coordinator.relay_all().unwrap();

    let ack = setup.ack_on_b(sequence);
    let Some(AcknowledgementStatus::Success(value)) = ack.status() else {
        panic!("expected a success acknowledgement, got {}", ack_text(&ack));
    };
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(value.as_str())
        .unwrap();
    assert!(String::from_utf8(decoded)
        .unwrap()
        .starts_with("packet forward failed after point of no return: "));

    assert_eq!(
        setup.network.balance(CHAIN_A, &setup.alice, "uatom"),
        amount(0)
    );
    assert_eq!(setup.b_balance(&setup.override_receiver), amount(931));
    assert_eq!(setup.b_balance(&setup.fee_address), amount(19));
    assert_eq!(setup.b_balance(&setup.community_pool()), amount(50));

    let failure = setup
        .network
        .chain(CHAIN_B)
        .events_of_kind("packet_forward_failure")
        .next()
        .cloned()
        .unwrap();
    assert_eq!(failure.attribute("refunded"), Some("false"));
    setup.assert_settled();
}

#[test_log::test]
fn bridge_fee_consuming_the_forward_acknowledges_right_away() {
    let mut setup = Forwarding::new();
    let b_to_c = setup.network.b_to_c.clone();
    let (voucher_b, fee_address) = (setup.voucher_b.clone(), setup.fee_address.clone());
    set_bridge_fees(
        &mut setup.network,
        CHAIN_B,
        vec![channel_fee(&b_to_c, &voucher_b, &fee_address, 2000, 100)],
    );
    let memo = setup.forward_to_carol();
    let sequence = setup.send(memo);

    let events = setup.network.coordinator.relay_all().unwrap();
    assert!(matches!(
        &events[..],
        [
            RelayEvent::Received { acknowledgement: Some(ack), .. },
            RelayEvent::Acknowledged { .. },
        ] if ack.is_successful()
    ));

    assert!(setup.ack_on_b(sequence).is_successful());
    assert_eq!(setup.b_balance(&setup.community_pool()), amount(50));
    assert_eq!(setup.b_balance(&setup.fee_address), amount(950));
    assert_eq!(setup.b_balance(&setup.override_receiver), amount(0));
    assert_eq!(
        setup
            .network
            .balance(CHAIN_C, &CAROL.into(), &setup.voucher_c),
        amount(0)
    );
    setup.assert_settled();
}

#[rstest]
#[case::not_json("hello", false)]
#[case::no_forward(r#"{"wasm":{"contract":"osmo1contract"}}"#, false)]
#[case::null_forward(r#"{"forward":null}"#, false)]
#[case::forward_not_an_object(r#"{"forward":"osmo1carol"}"#, true)]
#[case::bad_channel(
    r#"{"forward":{"receiver":"osmo1carol","port":"transfer","channel":"chan"}}"#,
    true
)]
fn memos_without_a_forward_are_plain_transfers(#[case] memo: &str, #[case] rejected: bool) {
    let mut setup = Forwarding::new();
    let bob = setup.network.account(CHAIN_B, "bob");
    let sequence = setup.send(memo);

    setup.network.coordinator.relay_all().unwrap();

    let ack = setup.ack_on_b(sequence);
    assert_eq!(ack.is_successful(), !rejected);
    if rejected {
        assert!(ack_text(&ack).contains("packet-forward-middleware error: "));
        setup.assert_refunded();
        assert_eq!(setup.b_balance(&bob), amount(0));
    } else {
        assert_eq!(setup.b_balance(&bob), amount(1000));
        assert_eq!(setup.b_balance(&setup.community_pool()), amount(0));
        setup.assert_settled();
    }
}
