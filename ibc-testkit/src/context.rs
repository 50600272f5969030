//! A mock chain hosting the Centauri transfer stack.

use core::mem;
use core::time::Duration;
use std::collections::{BTreeMap, BTreeSet};

use centauri_ibc_core::channel::{Acknowledgement, Height, Packet};
use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_ibc_core::primitives::{Signer, Timestamp};
use centauri_ibc_core::router::ModuleEvent;
use centauri_ibc_transfer_middleware::FeeKeeper;
use centauri_packet_forward::types::error::PacketForwardError;
use centauri_packet_forward::types::in_flight::InFlightPacket;
use centauri_packet_forward::PacketForwardKeeper;
use centauri_store::impls::InMemoryStore;
use centauri_store::types::MainStore;
use centauri_store::{Store, StoreError};
use centauri_transfer::bank::{escrow_account, BankKeeper};
use centauri_transfer_middleware::abci::begin_blocker;
use centauri_transfer_middleware::{TransferMiddlewareError, TransferMiddlewareKeeper};
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::{Amount, RawCoin};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::bank::{module_account, MockBank};

/// Store of one module. Every module gets its own so that their key
/// partitions cannot collide.
pub type ModuleStore = MainStore<InMemoryStore>;

/// 2023-11-14T22:13:20Z
pub const DEFAULT_GENESIS_TIME: Timestamp = Timestamp::from_nanoseconds(1_700_000_000_000_000_000);

/// Block interval of [`MockChain::advance_time`] when counting heights.
const BLOCK_TIME: Duration = Duration::from_secs(5);

/// Channel and packet state of a mock chain, kept outside the module stores.
///
/// It is cloned on every commit so that a failed transaction can be rolled
/// back together with the stores.
#[derive(Clone, Debug, Default)]
pub struct ChainState {
    /// Counterparty `(port, channel)` of every open channel end.
    pub(crate) channels: BTreeMap<(PortId, ChannelId), (PortId, ChannelId)>,
    pub(crate) next_channel: u64,
    pub(crate) next_sequence_send: BTreeMap<(PortId, ChannelId), Sequence>,
    /// Sent packets not acknowledged or timed out yet.
    pub(crate) commitments: BTreeMap<(PortId, ChannelId, Sequence), Packet>,
    /// Received packets, keyed by their destination end.
    pub(crate) receipts: BTreeSet<(PortId, ChannelId, Sequence)>,
    pub(crate) acknowledgements: BTreeMap<(PortId, ChannelId, Sequence), Acknowledgement>,
    /// Packets sent and not picked up by a relayer yet.
    pub(crate) outbox: Vec<Packet>,
    /// Acknowledgements written and not picked up by a relayer yet.
    pub(crate) ack_outbox: Vec<(Packet, Acknowledgement)>,
    pub(crate) events: Vec<ModuleEvent>,
    pub(crate) logs: Vec<String>,
}

/// Configuration of a [`MockChain`].
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MockChain))]
pub struct MockChainConfig {
    #[builder(setter(into))]
    pub chain_id: String,
    #[builder(default = "centauri".to_string(), setter(into))]
    pub account_prefix: String,
    #[builder(default = DEFAULT_GENESIS_TIME)]
    pub genesis_time: Timestamp,
    /// Governance account of the modules; derived from `gov` when unset.
    #[builder(default, setter(strip_option, into))]
    pub authority: Option<Signer>,
    /// Fail the block on scheduled removals of unknown parachain tokens.
    #[builder(default)]
    pub strict_removals: bool,
    /// Balances at genesis, as `(account, coin)`.
    #[builder(default)]
    pub genesis_balances: Vec<(Signer, RawCoin)>,
}

impl From<MockChainConfig> for MockChain {
    fn from(config: MockChainConfig) -> Self {
        let prefix = config.account_prefix;
        let authority = config
            .authority
            .unwrap_or_else(|| module_account(&prefix, "gov"));

        let stores: Vec<ModuleStore> = (0..4).map(|_| ModuleStore::default()).collect();
        let mut chain = MockChain {
            bank: MockBank::new(stores[0].share()),
            fees: FeeKeeper::new(stores[1].share(), authority.clone()),
            forward: PacketForwardKeeper::new(stores[2].share(), authority.clone()),
            parachain: TransferMiddlewareKeeper::new(stores[3].share(), authority.clone())
                .with_strict_removals(config.strict_removals),
            stores,
            community_pool: module_account(&prefix, "distribution"),
            parachain_module_account: module_account(&prefix, "transfermiddleware"),
            authority,
            account_prefix: prefix,
            chain_id: config.chain_id,
            timestamp: config.genesis_time,
            height: Height::new(0, 1),
            state: ChainState::default(),
            committed: ChainState::default(),
        };

        for (account, coin) in &config.genesis_balances {
            if let Err(err) = chain.bank.mint_coins(account, coin) {
                tracing::error!(%account, %coin, %err, "skipping genesis balance");
            }
        }
        if let Err(err) = chain.commit() {
            tracing::error!(%err, "failed to commit genesis");
        }
        chain
    }
}

/// A chain running the transfer application, the bridge fee keeper, the
/// parachain token keeper and the state of the packet forward middleware.
///
/// State changes accumulate until [`commit`](Self::commit) and can be
/// dropped with [`discard`](Self::discard), the way a transaction either
/// lands or reverts.
#[derive(Debug)]
pub struct MockChain {
    pub(crate) chain_id: String,
    pub(crate) account_prefix: String,
    pub(crate) timestamp: Timestamp,
    pub(crate) height: Height,
    pub(crate) stores: Vec<ModuleStore>,
    pub(crate) bank: MockBank<ModuleStore>,
    pub(crate) fees: FeeKeeper<ModuleStore>,
    pub(crate) forward: PacketForwardKeeper<ModuleStore>,
    pub(crate) parachain: TransferMiddlewareKeeper<ModuleStore>,
    pub(crate) authority: Signer,
    pub(crate) community_pool: Signer,
    pub(crate) parachain_module_account: Signer,
    pub(crate) state: ChainState,
    pub(crate) committed: ChainState,
}

impl MockChain {
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn account_prefix(&self) -> &str {
        &self.account_prefix
    }

    /// Block time.
    pub fn now(&self) -> Timestamp {
        self.timestamp
    }

    pub fn height(&self) -> Height {
        self.height
    }

    /// Moves the block time forward, one block per five seconds.
    pub fn advance_time(&mut self, duration: Duration) {
        self.timestamp = Timestamp::from_nanoseconds(
            self.timestamp
                .nanoseconds()
                .saturating_add(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)),
        );
        let blocks = (duration.as_secs() / BLOCK_TIME.as_secs()).max(1);
        self.height = Height::new(
            self.height.revision_number,
            self.height.revision_height.saturating_add(blocks),
        );
        trace!(chain = %self.chain_id, now = %self.timestamp, "advanced time");
    }

    pub fn authority(&self) -> &Signer {
        &self.authority
    }

    pub fn community_pool(&self) -> &Signer {
        &self.community_pool
    }

    pub fn parachain_module_account(&self) -> &Signer {
        &self.parachain_module_account
    }

    /// Escrow account of a transfer channel end of this chain.
    pub fn escrow_account(&self, port_id: &PortId, channel_id: &ChannelId) -> Signer {
        escrow_account(&self.account_prefix, port_id, channel_id)
    }

    /// An account of this chain derived from `name`.
    pub fn account(&self, name: &str) -> Signer {
        module_account(&self.account_prefix, name)
    }

    pub fn balance(&self, account: &Signer, denom: &str) -> Amount {
        self.bank.balance(account, denom)
    }

    pub fn bank(&self) -> &MockBank<ModuleStore> {
        &self.bank
    }

    pub fn fee_keeper(&self) -> &FeeKeeper<ModuleStore> {
        &self.fees
    }

    pub fn fee_keeper_mut(&mut self) -> &mut FeeKeeper<ModuleStore> {
        &mut self.fees
    }

    pub fn forward_keeper(&self) -> &PacketForwardKeeper<ModuleStore> {
        &self.forward
    }

    pub fn forward_keeper_mut(&mut self) -> &mut PacketForwardKeeper<ModuleStore> {
        &mut self.forward
    }

    pub fn parachain_keeper(&self) -> &TransferMiddlewareKeeper<ModuleStore> {
        &self.parachain
    }

    pub fn parachain_keeper_mut(&mut self) -> &mut TransferMiddlewareKeeper<ModuleStore> {
        &mut self.parachain
    }

    /// Mints `coin` to `account` and commits.
    pub fn fund(&mut self, account: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        self.bank.mint_coins(account, coin)?;
        self.commit().map_err(|e| TokenTransferError::Other(e.to_string()))
    }

    /// Packets waiting on the forward of a packet received earlier.
    pub fn in_flight_packets(&self) -> Result<Vec<(String, InFlightPacket)>, PacketForwardError> {
        self.forward.in_flight_packets()
    }

    /// Events of committed transactions, oldest first.
    pub fn events(&self) -> &[ModuleEvent] {
        &self.committed.events
    }

    /// Committed events of the given kind.
    pub fn events_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ModuleEvent> {
        self.committed.events.iter().filter(move |ev| ev.kind == kind)
    }

    pub fn logs(&self) -> &[String] {
        &self.committed.logs
    }

    /// Sent packets that were neither acknowledged nor timed out.
    pub fn pending_commitments(&self) -> usize {
        self.committed.commitments.len()
    }

    pub fn acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<&Acknowledgement> {
        self.committed
            .acknowledgements
            .get(&(port_id.clone(), channel_id.clone(), sequence))
    }

    /// Lands the pending state changes.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        for store in &mut self.stores {
            store.apply()?;
        }
        self.committed = self.state.clone();
        Ok(())
    }

    /// Drops the pending state changes.
    pub fn discard(&mut self) {
        for store in &mut self.stores {
            store.reset();
        }
        self.state = self.committed.clone();
        debug!(chain = %self.chain_id, "discarded uncommitted changes");
    }

    /// Runs the begin blocker of the parachain token keeper at the current
    /// block time, committing on success.
    pub fn begin_block(&mut self) -> Result<Vec<String>, TransferMiddlewareError> {
        let now = self.timestamp;
        match begin_blocker(&mut self.parachain, now) {
            Ok(removed) => {
                self.commit()?;
                Ok(removed)
            }
            Err(err) => {
                self.discard();
                Err(err)
            }
        }
    }

    pub(crate) fn reserve_channel(&mut self) -> ChannelId {
        let channel_id = ChannelId::new(self.state.next_channel);
        self.state.next_channel += 1;
        channel_id
    }

    pub(crate) fn open_channel(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        counterparty: (PortId, ChannelId),
    ) {
        debug!(
            chain = %self.chain_id,
            %port_id,
            %channel_id,
            counterparty_port = %counterparty.0,
            counterparty_channel = %counterparty.1,
            "opened channel"
        );
        self.state.channels.insert((port_id, channel_id), counterparty);
    }

    pub(crate) fn take_outbox(&mut self) -> Vec<Packet> {
        self.committed.outbox.clear();
        mem::take(&mut self.state.outbox)
    }

    pub(crate) fn take_ack_outbox(&mut self) -> Vec<(Packet, Acknowledgement)> {
        self.committed.ack_outbox.clear();
        mem::take(&mut self.state.ack_outbox)
    }

    pub(crate) fn has_outbound(&self) -> bool {
        !self.state.outbox.is_empty() || !self.state.ack_outbox.is_empty()
    }

    /// Records the receipt of `packet`; `false` when it was received before.
    pub(crate) fn record_receipt(&mut self, packet: &Packet) -> bool {
        self.state.receipts.insert((
            packet.port_id_on_b.clone(),
            packet.chan_id_on_b.clone(),
            packet.seq_on_a,
        ))
    }

    pub(crate) fn has_commitment(&self, packet: &Packet) -> bool {
        self.state.commitments.contains_key(&(
            packet.port_id_on_a.clone(),
            packet.chan_id_on_a.clone(),
            packet.seq_on_a,
        ))
    }

    pub(crate) fn delete_commitment(&mut self, packet: &Packet) {
        self.state.commitments.remove(&(
            packet.port_id_on_a.clone(),
            packet.chan_id_on_a.clone(),
            packet.seq_on_a,
        ));
    }

    pub(crate) fn record_events(&mut self, events: Vec<ModuleEvent>) {
        self.state.events.extend(events);
    }
}
