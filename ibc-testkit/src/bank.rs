//! A bank module over a store, as the mock chains use it.

use centauri_ibc_core::primitives::Signer;
use centauri_store::types::JsonStore;
use centauri_store::Store;
use centauri_transfer::bank::BankKeeper;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::{Amount, RawCoin};
use sha2::{Digest, Sha256};
use subtle_encoding::bech32;
use tracing::trace;

/// Partition of the balances, keyed `{account}/{denom}`.
const BALANCES_PREFIX: [u8; 1] = [0x01];

/// Partition of the total supply, keyed by denom.
const SUPPLY_PREFIX: [u8; 1] = [0x02];

/// Balances and supply of every denom on a mock chain.
#[derive(Clone, Debug)]
pub struct MockBank<S> {
    balances: JsonStore<S, Amount>,
    supply: JsonStore<S, Amount>,
}

fn balance_key(account: &Signer, denom: &str) -> String {
    format!("{account}/{denom}")
}

impl<S: Store> MockBank<S> {
    pub fn new(store: S) -> Self {
        Self {
            balances: JsonStore::new(store.clone(), BALANCES_PREFIX),
            supply: JsonStore::new(store, SUPPLY_PREFIX),
        }
    }

    /// Total amount of `denom` in existence.
    pub fn supply(&self, denom: &str) -> Amount {
        self.supply.get(denom).ok().flatten().unwrap_or_default()
    }

    /// Every non-zero balance of `account`, by denom.
    pub fn balances(&self, account: &Signer) -> Vec<(String, Amount)> {
        let prefix = format!("{account}/");
        self.balances
            .entries()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, amount)| {
                let key = String::from_utf8(key).ok()?;
                let denom = key.strip_prefix(&prefix)?;
                (!amount.is_zero()).then(|| (denom.to_string(), amount))
            })
            .collect()
    }

    fn set_balance(
        &mut self,
        account: &Signer,
        denom: &str,
        amount: Amount,
    ) -> Result<(), TokenTransferError> {
        let key = balance_key(account, denom);
        if amount.is_zero() {
            self.balances.delete(key);
        } else {
            self.balances.set(key, &amount).map_err(store_error)?;
        }
        Ok(())
    }

    fn debit(&mut self, account: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        let available = self.balance(account, &coin.denom);
        let remaining =
            available
                .checked_sub(coin.amount)
                .ok_or_else(|| TokenTransferError::InsufficientFunds {
                    send_attempt: coin.to_string(),
                    available_funds: RawCoin::new(coin.denom.clone(), available).to_string(),
                })?;
        self.set_balance(account, &coin.denom, remaining)
    }

    fn credit(&mut self, account: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        let balance = self
            .balance(account, &coin.denom)
            .checked_add(coin.amount)
            .ok_or_else(|| TokenTransferError::AmountOverflow {
                denom: coin.denom.clone(),
            })?;
        self.set_balance(account, &coin.denom, balance)
    }
}

impl<S: Store> BankKeeper for MockBank<S> {
    fn balance(&self, account: &Signer, denom: &str) -> Amount {
        self.balances
            .get(balance_key(account, denom))
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    fn send_coins(
        &mut self,
        from: &Signer,
        to: &Signer,
        coin: &RawCoin,
    ) -> Result<(), TokenTransferError> {
        // credit cannot overflow what the debit leaves consistent, so check first
        self.balance(to, &coin.denom)
            .checked_add(coin.amount)
            .ok_or_else(|| TokenTransferError::AmountOverflow {
                denom: coin.denom.clone(),
            })?;
        self.debit(from, coin)?;
        self.credit(to, coin)?;
        trace!(%from, %to, %coin, "sent coins");
        Ok(())
    }

    fn mint_coins(&mut self, to: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        let supply = self
            .supply(&coin.denom)
            .checked_add(coin.amount)
            .ok_or_else(|| TokenTransferError::AmountOverflow {
                denom: coin.denom.clone(),
            })?;
        self.credit(to, coin)?;
        self.supply
            .set(coin.denom.as_str(), &supply)
            .map_err(store_error)?;
        trace!(%to, %coin, "minted coins");
        Ok(())
    }

    fn burn_coins(&mut self, from: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
        self.debit(from, coin)?;
        let supply = self.supply(&coin.denom).saturating_sub(coin.amount);
        self.supply
            .set(coin.denom.as_str(), &supply)
            .map_err(store_error)?;
        trace!(%from, %coin, "burned coins");
        Ok(())
    }
}

fn store_error(e: centauri_store::StoreError) -> TokenTransferError {
    TokenTransferError::Other(e.to_string())
}

/// Address of a module account, as cosmos derives it from the module name.
pub fn module_account(account_prefix: &str, name: &str) -> Signer {
    let hash = Sha256::digest(name.as_bytes());
    Signer::from(bech32::encode(account_prefix, &hash[..20]))
}
