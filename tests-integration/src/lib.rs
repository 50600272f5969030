//! Shared setup of the scenario tests: three mock chains in a line,
//! `A <-> B <-> C`, with the forwarding chain `B` in the middle.

use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_transfer_middleware::types::{ChannelFee, CoinItem, Params, TxPriorityFee};
use centauri_packet_forward::types::config::ForwardConfig;
use centauri_testkit::context::{MockChain, MockChainConfig};
use centauri_testkit::fixtures::{MsgTransferConfig, PacketDataConfig};
use centauri_testkit::relayer::Coordinator;
use centauri_transfer::bank::BankKeeper;
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::{Amount, PrefixedDenom, RawCoin};

pub const CHAIN_A: &str = "cosmoshub-4";
pub const CHAIN_B: &str = "centauri-1";
pub const CHAIN_C: &str = "osmosis-1";

/// Three chains connected in a line.
#[derive(Debug)]
pub struct Network {
    pub coordinator: Coordinator,
    pub a_to_b: ChannelId,
    pub b_to_a: ChannelId,
    pub b_to_c: ChannelId,
    pub c_to_b: ChannelId,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    pub fn new() -> Self {
        Self::with_config(ForwardConfig::default())
    }

    /// Network whose middle chain forwards with `config`.
    pub fn with_config(config: ForwardConfig) -> Self {
        let mut coordinator = Coordinator::new();
        coordinator.add_chain(
            MockChainConfig::builder()
                .chain_id(CHAIN_A)
                .account_prefix("cosmos")
                .build(),
        );
        coordinator.add_chain_with_config(
            MockChainConfig::builder().chain_id(CHAIN_B).build(),
            config,
        );
        coordinator.add_chain(
            MockChainConfig::builder()
                .chain_id(CHAIN_C)
                .account_prefix("osmo")
                .build(),
        );

        let (a_to_b, b_to_a) = coordinator
            .connect(CHAIN_A, CHAIN_B)
            .expect("fresh chains connect");
        let (b_to_c, c_to_b) = coordinator
            .connect(CHAIN_B, CHAIN_C)
            .expect("fresh chains connect");

        Self {
            coordinator,
            a_to_b,
            b_to_a,
            b_to_c,
            c_to_b,
        }
    }

    pub fn chain(&self, chain_id: &str) -> &MockChain {
        self.coordinator
            .chain(chain_id)
            .expect("chain is part of the network")
    }

    pub fn chain_mut(&mut self, chain_id: &str) -> &mut MockChain {
        self.coordinator
            .chain_mut(chain_id)
            .expect("chain is part of the network")
    }

    pub fn account(&self, chain_id: &str, name: &str) -> Signer {
        self.chain(chain_id).account(name)
    }

    pub fn fund(&mut self, chain_id: &str, account: &Signer, denom: &str, amount: u64) {
        self.chain_mut(chain_id)
            .fund(account, &RawCoin::new(denom.to_string(), amount))
            .expect("minting at genesis succeeds");
    }

    pub fn balance(&self, chain_id: &str, account: &Signer, denom: &str) -> Amount {
        self.chain(chain_id).balance(account, denom)
    }

    /// Bank transfer between two accounts of `chain_id`, committed in a
    /// block of its own.
    pub fn send(&mut self, chain_id: &str, from: &Signer, to: &Signer, denom: &str, amount: u64) {
        let chain = self.chain_mut(chain_id);
        chain
            .send_coins(from, to, &RawCoin::new(denom.to_string(), amount))
            .expect("sender holds the amount");
        chain.commit().expect("in-memory commit succeeds");
    }
}

/// On-chain denom of a token with the given full trace.
pub fn ibc_denom(trace: &str) -> String {
    trace
        .parse::<PrefixedDenom>()
        .expect("valid denom trace")
        .ibc_denom()
}

pub fn amount(value: u64) -> Amount {
    Amount::from(value)
}

pub fn transfer(
    channel: &ChannelId,
    denom: &str,
    amount: u64,
    sender: &Signer,
    receiver: impl Into<Signer>,
    memo: impl Into<String>,
) -> MsgTransfer {
    MsgTransferConfig::builder()
        .chan_id_on_a(channel.clone())
        .packet_data(
            PacketDataConfig::builder()
                .denom(denom)
                .amount(amount)
                .sender(sender.clone())
                .receiver(receiver)
                .memo(memo)
                .build(),
        )
        .build()
}

/// Bridge fee schedule of a single token on a single channel.
pub fn channel_fee(
    channel: &ChannelId,
    denom: &str,
    fee_address: &Signer,
    min_fee: u64,
    percentage: i64,
) -> ChannelFee {
    ChannelFee {
        channel: channel.clone(),
        allowed_tokens: vec![CoinItem {
            min_fee: RawCoin::new(denom.to_string(), min_fee),
            percentage,
            tx_priority_fee: Vec::new(),
        }],
        fee_address: fee_address.clone(),
        min_timeout_timestamp: 0,
    }
}

/// `fee` with an extra charge for transfers whose memo names `priority`.
pub fn with_priority_fee(mut fee: ChannelFee, priority: &str, surcharge: u64) -> ChannelFee {
    for token in &mut fee.allowed_tokens {
        token.tx_priority_fee.push(TxPriorityFee {
            priority: priority.to_string(),
            priority_fee: RawCoin::new(token.min_fee.denom.clone(), surcharge),
        });
    }
    fee
}

/// Installs bridge fee params on `chain_id` through its authority.
pub fn set_bridge_fees(network: &mut Network, chain_id: &str, channel_fees: Vec<ChannelFee>) {
    let chain = network.chain_mut(chain_id);
    let authority = chain.authority().clone();
    chain
        .fee_keeper_mut()
        .set_params(&authority, Params { channel_fees })
        .expect("authority may set params");
    chain.commit().expect("in-memory commit succeeds");
}
