use core::cmp::min;

use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_ibc_core::primitives::{Signer, Timestamp};
use centauri_store::types::ProtobufStore;
use centauri_store::Store;
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::proto::ProtoCoin;
use centauri_transfer_types::{Amount, Memo, RawCoin};
use tracing::{debug, info};

use crate::error::FeeError;
use crate::keys::{sequence_key, PARAMS_KEY, PARAMS_PREFIX, SEQUENCE_FEE_PREFIX};
use crate::types::raw::RawParams;
use crate::types::{BridgeFee, ChannelFeeConfig, Params};

/// Keeper of the channel bridge fees.
#[derive(Clone, Debug)]
pub struct FeeKeeper<S> {
    params: ProtobufStore<S, Params, RawParams>,
    sequence_fees: ProtobufStore<S, RawCoin, ProtoCoin>,
    /// The only signer allowed to update the params, typically governance.
    authority: Signer,
}

impl<S: Store> FeeKeeper<S> {
    pub fn new(store: S, authority: Signer) -> Self {
        Self {
            params: ProtobufStore::new(store.clone(), PARAMS_PREFIX),
            sequence_fees: ProtobufStore::new(store, SEQUENCE_FEE_PREFIX),
            authority,
        }
    }

    pub fn authority(&self) -> &Signer {
        &self.authority
    }

    /// Current params; empty when never set.
    pub fn params(&self) -> Result<Params, FeeError> {
        Ok(self.params.get(PARAMS_KEY)?.unwrap_or_default())
    }

    /// Replaces the params. Only the module authority may do so.
    pub fn set_params(&mut self, signer: &Signer, params: Params) -> Result<(), FeeError> {
        if signer != &self.authority {
            return Err(FeeError::Unauthorized {
                signer: signer.to_string(),
                authority: self.authority.to_string(),
            });
        }
        params.validate()?;
        self.params.set(PARAMS_KEY, &params)?;
        info!(channels = params.channel_fees.len(), "updated bridge fee params");
        Ok(())
    }

    /// Fee settings of `denom` (on-chain denom) on `channel`, if the token is
    /// allowed there.
    pub fn fee_config(
        &self,
        channel: &ChannelId,
        denom: &str,
    ) -> Result<Option<ChannelFeeConfig>, FeeError> {
        let params = self.params()?;
        Ok(params.channel_fee(channel).and_then(|channel_fee| {
            channel_fee
                .coin(denom)
                .map(|coin| ChannelFeeConfig::new(channel_fee, coin.clone()))
        }))
    }

    /// Account collecting the fees of `channel`.
    pub fn channel_fee_address(&self, channel: &ChannelId) -> Result<Option<Signer>, FeeError> {
        Ok(self
            .params()?
            .channel_fee(channel)
            .map(|channel_fee| channel_fee.fee_address.clone()))
    }

    /// Computes the bridge fee of an outbound transfer at block time `now`
    /// and lowers the transferred amount by it.
    ///
    /// Returns `None`, leaving `msg` untouched, when the source channel has
    /// no fee configuration. No funds are moved.
    pub fn compute_bridge_fee(
        &self,
        msg: &mut MsgTransfer,
        now: Timestamp,
    ) -> Result<Option<BridgeFee>, FeeError> {
        let params = self.params()?;
        let Some(channel_fee) = params.channel_fee(&msg.chan_id_on_a) else {
            return Ok(None);
        };

        if channel_fee.min_timeout_timestamp > 0 {
            let timeout = msg.timeout_timestamp_on_b;
            if timeout < now {
                return Err(FeeError::TimeoutInPast);
            }
            let difference = timeout.nanoseconds() - now.nanoseconds();
            // positive, checked above
            let min_timeout = channel_fee.min_timeout_timestamp as u64;
            if difference < min_timeout {
                return Err(FeeError::TimeoutTooSoon);
            }
        }

        let denom = msg.packet_data.token.denom.ibc_denom();
        let coin = channel_fee
            .coin(&denom)
            .ok_or(FeeError::TokenNotAllowed)?;
        let percentage = u64::try_from(coin.percentage)
            .ok()
            .filter(|percentage| *percentage >= 1)
            .ok_or(FeeError::InvalidPercentage {
                percentage: coin.percentage,
            })?;

        let mut min_fee = coin.min_fee.amount;
        if let Some(priority) = memo_priority(&msg.packet_data.memo) {
            if let Some(priority_fee) = coin.priority_fee(&priority) {
                if priority_fee.priority_fee.denom == coin.min_fee.denom {
                    min_fee = min_fee
                        .checked_add(priority_fee.priority_fee.amount)
                        .ok_or_else(|| FeeError::InvalidParams {
                            reason: format!("priority fee overflow for {denom}"),
                        })?;
                }
            }
        }

        let amount = msg.packet_data.token.amount;
        let mut charge = min(min_fee, amount);
        let mut remaining = amount.saturating_sub(charge);

        if !remaining.is_zero() {
            let percentage_charge = remaining
                .checked_div(Amount::from(percentage))
                .unwrap_or_default();
            remaining = remaining.saturating_sub(percentage_charge);
            charge = charge.checked_add(percentage_charge).unwrap_or(amount);
        }

        msg.packet_data.token.amount = remaining;

        debug!(
            channel = %msg.chan_id_on_a,
            %denom,
            %charge,
            %remaining,
            "computed bridge fee"
        );

        Ok(Some(BridgeFee {
            fee: RawCoin::new(denom, charge),
            sender: msg.packet_data.sender.clone(),
            receiver: channel_fee.fee_address.clone(),
        }))
    }

    /// Fee charged on the packet `sequence` sent from `port_id`/`channel_id`.
    pub fn sequence_fee(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<Option<RawCoin>, FeeError> {
        Ok(self
            .sequence_fees
            .get(sequence_key(port_id, channel_id, sequence))?)
    }

    pub fn set_sequence_fee(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        fee: &RawCoin,
    ) -> Result<(), FeeError> {
        self.sequence_fees
            .set(sequence_key(port_id, channel_id, sequence), fee)?;
        Ok(())
    }

    /// Returns whether a record existed.
    pub fn delete_sequence_fee(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> bool {
        self.sequence_fees
            .delete(sequence_key(port_id, channel_id, sequence))
    }

    /// Removes and returns the fee record of a packet.
    pub fn take_sequence_fee(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<Option<RawCoin>, FeeError> {
        let fee = self.sequence_fee(port_id, channel_id, sequence)?;
        if fee.is_some() {
            self.delete_sequence_fee(port_id, channel_id, sequence);
        }
        Ok(fee)
    }

    /// Number of packets whose fee is still on record.
    pub fn pending_sequence_fees(&self) -> Result<usize, FeeError> {
        Ok(self.sequence_fees.entries()?.len())
    }
}

/// Reads the top-level `"priority"` string of a transfer memo.
pub fn memo_priority(memo: &Memo) -> Option<String> {
    match memo.json_field("priority")? {
        serde_json::Value::String(priority) => Some(priority),
        _ => None,
    }
}
