//! The bank capability the transfer stack moves funds with, and the
//! deterministic escrow accounts of transfer channels.

use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_ibc_core::primitives::Signer;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::{Amount, RawCoin, VERSION};
use sha2::{Digest, Sha256};
use subtle_encoding::bech32;

/// Account balances keyed by on-chain denom (`ppica`, `ibc/{HASH}`, ...).
///
/// Every operation either applies in full or leaves balances untouched.
pub trait BankKeeper {
    /// Current balance of `account` in `denom`; zero when unknown.
    fn balance(&self, account: &Signer, denom: &str) -> Amount;

    fn send_coins(
        &mut self,
        from: &Signer,
        to: &Signer,
        coin: &RawCoin,
    ) -> Result<(), TokenTransferError>;

    fn mint_coins(&mut self, to: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError>;

    fn burn_coins(&mut self, from: &Signer, coin: &RawCoin) -> Result<(), TokenTransferError>;
}

/// Derives the escrow address of a transfer channel as in cosmos ADR-028,
/// prefixed with the ICS-20 version.
pub fn cosmos_adr028_escrow_address(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    let contents = format!("{port_id}/{channel_id}");

    let mut hasher = Sha256::new();
    hasher.update(VERSION.as_bytes());
    hasher.update([0]);
    hasher.update(contents.as_bytes());

    let mut hash = hasher.finalize().to_vec();
    hash.truncate(20);
    hash
}

/// Bech32 account holding the escrowed tokens of a channel.
pub fn escrow_account(account_prefix: &str, port_id: &PortId, channel_id: &ChannelId) -> Signer {
    let addr = cosmos_adr028_escrow_address(port_id, channel_id);
    Signer::from(bech32::encode(account_prefix, addr))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // addresses obtained using `gaiad query ibc-transfer escrow-address [port-id] [channel-id]`
    #[rstest]
    #[case("transfer", "channel-141", "cosmos1x54ltnyg88k0ejmk8ytwrhd3ltm84xehrnlslf")]
    #[case("transfer", "channel-207", "cosmos1ju6tlfclulxumtt2kglvnxduj5d93a64r5czge")]
    #[case("transfer", "channel-187", "cosmos177x69sver58mcfs74x6dg0tv6ls4s3xmmcaw53")]
    fn test_cosmos_escrow_address(
        #[case] port_id: &str,
        #[case] channel_id: &str,
        #[case] address: &str,
    ) {
        let port_id = port_id.parse().unwrap();
        let channel_id = channel_id.parse().unwrap();
        assert_eq!(
            escrow_account("cosmos", &port_id, &channel_id).as_ref(),
            address
        );
    }
}
