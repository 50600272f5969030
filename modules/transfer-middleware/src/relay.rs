//! Exchange between parachain vouchers and their native denom.
//!
//! The module account holds every voucher that was exchanged, so the native
//! supply of a parachain token always equals the vouchers it keeps.

use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_core::primitives::Signer;
use centauri_store::Store;
use centauri_transfer::bank::BankKeeper;
use centauri_transfer_types::RawCoin;
use tracing::debug;

use crate::error::TransferMiddlewareError;
use crate::keeper::TransferMiddlewareKeeper;

/// Exchanges a voucher received on `channel` for its native denom.
///
/// Returns the native coin credited to `receiver`, or `None` when the
/// voucher is not a parachain token registered for that channel.
pub fn convert_received_voucher<S, B>(
    keeper: &TransferMiddlewareKeeper<S>,
    bank: &mut B,
    module_account: &Signer,
    receiver: &Signer,
    channel: &ChannelId,
    voucher: &RawCoin,
) -> Result<Option<RawCoin>, TransferMiddlewareError>
where
    S: Store,
    B: BankKeeper,
{
    let Some(native_denom) = keeper.native_denom_by_ibc_denom(&voucher.denom)? else {
        return Ok(None);
    };
    let info = keeper
        .parachain_ibc_token_info_by_native_denom(&native_denom)?
        .ok_or_else(|| TransferMiddlewareError::CorruptedState {
            reason: format!("no token info for {native_denom}"),
        })?;
    if &info.channel_id != channel {
        return Ok(None);
    }

    let native = RawCoin::new(native_denom, voucher.amount);
    bank.send_coins(receiver, module_account, voucher)?;
    bank.mint_coins(receiver, &native)?;

    debug!(%receiver, %voucher, %native, "converted parachain voucher");
    Ok(Some(native))
}

/// Undoes [`convert_received_voucher`]: burns the native coin held by
/// `holder` and hands the voucher back.
///
/// Returns the voucher, or `None` when `native` is not a registered
/// parachain token.
pub fn revert_native_conversion<S, B>(
    keeper: &TransferMiddlewareKeeper<S>,
    bank: &mut B,
    module_account: &Signer,
    holder: &Signer,
    native: &RawCoin,
) -> Result<Option<RawCoin>, TransferMiddlewareError>
where
    S: Store,
    B: BankKeeper,
{
    let Some(info) = keeper.parachain_ibc_token_info_by_native_denom(&native.denom)? else {
        return Ok(None);
    };

    let voucher = RawCoin::new(info.ibc_denom, native.amount);
    bank.burn_coins(holder, native)?;
    bank.send_coins(module_account, holder, &voucher)?;

    debug!(%holder, %native, %voucher, "reverted parachain conversion");
    Ok(Some(voucher))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use centauri_transfer_types::error::TokenTransferError;
    use centauri_transfer_types::Amount;

    use super::*;
    use crate::keeper::tests::{add_pica, keeper, PICA_VOUCHER};

    #[derive(Default)]
    struct Balances(BTreeMap<(String, String), Amount>);

    impl Balances {
        fn debit(&mut self, from: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
            let available = self.balance(from, &coin.denom);
            let rest = available.checked_sub(coin.amount).ok_or_else(|| {
                TokenTransferError::InsufficientFunds {
                    send_attempt: coin.to_string(),
                    available_funds: available.to_string(),
                }
            })?;
            self.0
                .insert((from.to_string(), coin.denom.clone()), rest);
            Ok(())
        }
    }

    impl BankKeeper for Balances {
        fn balance(&self, account: &Signer, denom: &str) -> Amount {
            self.0
                .get(&(account.to_string(), denom.to_string()))
                .copied()
                .unwrap_or_default()
        }

        fn send_coins(
            &mut self,
            from: &Signer,
            to: &Signer,
            coin: &RawCoin,
        ) -> Result<(), TokenTransferError> {
            self.debit(from, coin)?;
            self.mint_coins(to, coin)
        }

        fn mint_coins(&mut self, to: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
            let entry = self
                .0
                .entry((to.to_string(), coin.denom.clone()))
                .or_default();
            *entry = entry.checked_add(coin.amount).ok_or(TokenTransferError::AmountOverflow {
                denom: coin.denom.clone(),
            })?;
            Ok(())
        }

        fn burn_coins(&mut self, from: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError> {
            self.debit(from, coin)
        }
    }

    #[test]
    fn voucher_round_trips_through_the_native_denom() {
        let mut keeper = keeper();
        add_pica(&mut keeper);
        let module: Signer = "centauri1module".into();
        let alice: Signer = "centauri1alice".into();
        let voucher = RawCoin::new(PICA_VOUCHER.to_string(), 1_000u64);

        let mut bank = Balances::default();
        bank.mint_coins(&alice, &voucher).unwrap();

        let native = convert_received_voucher(
            &keeper,
            &mut bank,
            &module,
            &alice,
            &ChannelId::new(0),
            &voucher,
        )
        .unwrap()
        .unwrap();
        assert_eq!(native, RawCoin::new("ppica".to_string(), 1_000u64));
        assert_eq!(bank.balance(&alice, "ppica"), Amount::from(1_000u64));
        assert_eq!(bank.balance(&alice, PICA_VOUCHER), Amount::zero());
        assert_eq!(bank.balance(&module, PICA_VOUCHER), Amount::from(1_000u64));

        let back = revert_native_conversion(&keeper, &mut bank, &module, &alice, &native)
            .unwrap()
            .unwrap();
        assert_eq!(back, voucher);
        assert_eq!(bank.balance(&alice, "ppica"), Amount::zero());
        assert_eq!(bank.balance(&alice, PICA_VOUCHER), Amount::from(1_000u64));
        assert_eq!(bank.balance(&module, PICA_VOUCHER), Amount::zero());
    }

    #[test]
    fn unregistered_or_foreign_channel_vouchers_are_kept() {
        let mut keeper = keeper();
        add_pica(&mut keeper);
        let module: Signer = "centauri1module".into();
        let alice: Signer = "centauri1alice".into();
        let mut bank = Balances::default();

        let other = RawCoin::new("ibc/OTHER".to_string(), 5u64);
        assert_eq!(
            convert_received_voucher(&keeper, &mut bank, &module, &alice, &ChannelId::new(0), &other)
                .unwrap(),
            None
        );

        // registered voucher arriving over another channel
        let voucher = RawCoin::new(PICA_VOUCHER.to_string(), 5u64);
        assert_eq!(
            convert_received_voucher(&keeper, &mut bank, &module, &alice, &ChannelId::new(9), &voucher)
                .unwrap(),
            None
        );

        let plain = RawCoin::new("uatom".to_string(), 5u64);
        assert_eq!(
            revert_native_conversion(&keeper, &mut bank, &module, &alice, &plain).unwrap(),
            None
        );
    }
}
