use centauri_ibc_core::channel::{Acknowledgement, AcknowledgementStatus, Packet, PacketError};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_core::router::{Module, ModuleExtras};
use centauri_transfer::bank::BankKeeper;
use centauri_transfer::context::TokenTransferValidationContext;
use centauri_ibc_transfer_middleware::transfer::settle_bridge_fee;
use centauri_transfer::module::{
    on_acknowledgement_packet_execute, on_acknowledgement_packet_validate,
    on_recv_packet_execute, on_timeout_packet_execute, on_timeout_packet_validate,
};
use centauri_transfer_middleware::relay::convert_received_voucher;
use centauri_transfer_middleware::TransferMiddlewareError;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::{
    is_receiver_chain_source, Amount, RawCoin, TracePrefix,
};
use tracing::{debug, warn};

use crate::context::MockChain;

impl MockChain {
    /// Exchanges the voucher just minted for a received parachain asset
    /// into its native denom.
    fn convert_parachain_voucher(&mut self, packet: &Packet) -> Result<(), TransferMiddlewareError> {
        let Ok(data) = PacketData::from_bytes(&packet.data) else {
            return Ok(());
        };
        if is_receiver_chain_source(&packet.port_id_on_a, &packet.chan_id_on_a, &data.token.denom)
        {
            return Ok(());
        }

        let mut denom = data.token.denom;
        denom.add_trace_prefix(TracePrefix::new(
            packet.port_id_on_b.clone(),
            packet.chan_id_on_b.clone(),
        ));
        let voucher = RawCoin::new(denom.ibc_denom(), data.token.amount);

        convert_received_voucher(
            &self.parachain,
            &mut self.bank,
            &self.parachain_module_account,
            &data.receiver,
            &packet.chan_id_on_b,
            &voucher,
        )?;
        Ok(())
    }

    /// Drops the bridge fee record of a settled outbound packet, returning
    /// the fee to the sender unless the packet was delivered.
    fn close_bridge_fee(&mut self, packet: &Packet, delivered: bool) -> Result<(), PacketError> {
        let returned = settle_bridge_fee(&mut self.bank, &mut self.fees, packet, delivered)
            .map_err(|err| PacketError::AppModule {
                description: err.to_string(),
            })?;
        if let Some(fee) = returned {
            debug!(chain = %self.chain_id, sequence = %packet.seq_on_a, %fee, "bridge fee returned");
        }
        Ok(())
    }
}

impl TokenTransferValidationContext for MockChain {
    fn bech32_account_prefix(&self) -> String {
        self.account_prefix.clone()
    }

    fn spendable_balance(&self, account: &Signer, denom: &str) -> Amount {
        self.bank.balance(account, denom)
    }

    fn total_supply(&self, denom: &str) -> Amount {
        self.bank.supply(denom)
    }
}

impl BankKeeper for MockChain {
    fn balance(&self, account: &Signer, denom: &str) -> Amount {
        self.bank.balance(account, denom)
    }

    fn send_coins(
        &mut self,
        from: &Signer,
        to: &Signer,
        coin: &RawCoin,
    ) -> Result<(), TokenTransferError> {
        self.bank.send_coins(from, to, coin)
    }

    fn mint_coins(&mut self, to: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        self.bank.mint_coins(to, coin)
    }

    fn burn_coins(&mut self, from: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        self.bank.burn_coins(from, coin)
    }
}

/// The ICS-20 application, followed by the exchange of parachain vouchers
/// for their native denom.
impl Module for MockChain {
    fn on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Option<Acknowledgement>) {
        let (extras, ack) = on_recv_packet_execute(self, packet);
        if !ack.is_successful() {
            return (extras, Some(ack));
        }

        if let Err(err) = self.convert_parachain_voucher(packet) {
            warn!(chain = %self.chain_id, %err, "parachain voucher conversion failed");
            let status = TokenTransferError::Other(err.to_string()).into();
            return (extras, Some(AcknowledgementStatus::error(status).into()));
        }

        (extras, Some(ack))
    }

    fn on_acknowledgement_packet_validate(
        &self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> Result<(), PacketError> {
        on_acknowledgement_packet_validate(self, packet, acknowledgement, relayer)
            .map_err(PacketError::from)
    }

    fn on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        let (extras, result) =
            on_acknowledgement_packet_execute(self, packet, acknowledgement, relayer);
        let result = result
            .map_err(PacketError::from)
            .and_then(|()| self.close_bridge_fee(packet, acknowledgement.is_successful()));
        (extras, result)
    }

    fn on_timeout_packet_validate(
        &self,
        packet: &Packet,
        relayer: &Signer,
    ) -> Result<(), PacketError> {
        on_timeout_packet_validate(self, packet, relayer).map_err(PacketError::from)
    }

    fn on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        let (extras, result) = on_timeout_packet_execute(self, packet, relayer);
        let result = result
            .map_err(PacketError::from)
            .and_then(|()| self.close_bridge_fee(packet, false));
        (extras, result)
    }
}
