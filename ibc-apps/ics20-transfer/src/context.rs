//! What the ICS-20 application needs from its host chain.
//!
//! The host only exposes balances, supplies and its address prefix. Moving
//! funds goes through [`BankKeeper`], so escrowing, unescrowing, minting and
//! burning vouchers are the same on every host.

use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_ibc_core::primitives::Signer;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::{Amount, RawCoin};

use crate::bank::{escrow_account, BankKeeper};

/// Read access to the host bank.
pub trait TokenTransferValidationContext {
    /// Bech32 prefix of account addresses on this chain.
    fn bech32_account_prefix(&self) -> String;

    /// Amount of `denom` that `account` can move.
    fn spendable_balance(&self, account: &Signer, denom: &str) -> Amount;

    /// Total amount of `denom` in circulation on this chain.
    fn total_supply(&self, denom: &str) -> Amount;

    /// Account holding the tokens escrowed on a local channel end.
    fn escrow_account(&self, port_id: &PortId, channel_id: &ChannelId) -> Signer {
        escrow_account(&self.bech32_account_prefix(), port_id, channel_id)
    }

    /// Fails with [`TokenTransferError::InsufficientFunds`] unless `account`
    /// holds at least `coin`.
    fn ensure_spendable(&self, account: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        let available = self.spendable_balance(account, &coin.denom);
        if available < coin.amount {
            return Err(TokenTransferError::InsufficientFunds {
                send_attempt: coin.to_string(),
                available_funds: RawCoin::new(coin.denom.clone(), available).to_string(),
            });
        }
        Ok(())
    }

    /// Fails when minting `coin` would overflow the supply of its denom.
    fn ensure_mintable(&self, coin: &RawCoin) -> Result<(), TokenTransferError> {
        self.total_supply(&coin.denom)
            .checked_add(coin.amount)
            .map(|_| ())
            .ok_or_else(|| TokenTransferError::AmountOverflow {
                denom: coin.denom.clone(),
            })
    }
}

/// Read and write access to the host bank.
///
/// Blanket-implemented for every host that can both answer balance queries
/// and move funds.
pub trait TokenTransferExecutionContext: TokenTransferValidationContext + BankKeeper {}

impl<T> TokenTransferExecutionContext for T where T: TokenTransferValidationContext + BankKeeper {}
