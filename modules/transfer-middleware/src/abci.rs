//! Per-block processing of scheduled removals.

use centauri_ibc_core::primitives::Timestamp;
use centauri_store::Store;
use tracing::{error, warn};

use crate::error::TransferMiddlewareError;
use crate::keeper::TransferMiddlewareKeeper;

/// Removes every token whose scheduled `remove_time` lies strictly before
/// the block time `now`, and drops the processed queue entries.
///
/// Returns the native denoms that were removed. An entry whose token is no
/// longer registered is dropped with a warning, unless the keeper has strict
/// removals enabled, in which case the block fails with the error.
pub fn begin_blocker<S: Store>(
    keeper: &mut TransferMiddlewareKeeper<S>,
    now: Timestamp,
) -> Result<Vec<String>, TransferMiddlewareError> {
    let mut removed = Vec::new();

    for (key, entry) in keeper.remove_list_entries()? {
        // keys sort by time
        if entry.remove_time >= now {
            break;
        }

        match keeper.remove_parachain_ibc_info(&entry.native_denom) {
            Ok(_) => removed.push(entry.native_denom),
            Err(TransferMiddlewareError::NotFound { native_denom }) if !keeper.strict_removals() => {
                warn!(%native_denom, "scheduled removal of an unregistered parachain token");
            }
            Err(err) => {
                error!(native_denom = %entry.native_denom, %err, "scheduled removal failed");
                return Err(err);
            }
        }
        keeper.delete_remove_list_entry(&key);
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use centauri_ibc_core::host::identifiers::ChannelId;
    use test_log::test;

    use super::*;
    use crate::keeper::tests::{add_pica, keeper};

    #[test]
    fn due_entries_are_removed_once() {
        let mut keeper = keeper();
        add_pica(&mut keeper);
        keeper
            .add_to_remove_list("ppica".to_string(), Timestamp::from_nanoseconds(100))
            .unwrap();

        // not after the remove time yet
        assert!(begin_blocker(&mut keeper, Timestamp::from_nanoseconds(100))
            .unwrap()
            .is_empty());
        assert!(keeper.has_parachain_ibc_token_info_by_native_denom("ppica"));
        assert_eq!(keeper.remove_list().unwrap().len(), 1);

        let removed = begin_blocker(&mut keeper, Timestamp::from_nanoseconds(101)).unwrap();
        assert_eq!(removed, ["ppica"]);
        assert!(!keeper.has_parachain_ibc_token_info_by_native_denom("ppica"));
        assert!(keeper.remove_list().unwrap().is_empty());

        assert!(begin_blocker(&mut keeper, Timestamp::from_nanoseconds(200))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn only_past_entries_are_processed_in_order() {
        let mut keeper = keeper();
        add_pica(&mut keeper);
        keeper
            .add_parachain_ibc_info(
                "ibc/OSMO".to_string(),
                ChannelId::new(3),
                "uosmo".to_string(),
                "osmo".to_string(),
            )
            .unwrap();
        keeper
            .add_to_remove_list("uosmo".to_string(), Timestamp::from_nanoseconds(50))
            .unwrap();
        keeper
            .add_to_remove_list("ppica".to_string(), Timestamp::from_nanoseconds(10))
            .unwrap();

        let removed = begin_blocker(&mut keeper, Timestamp::from_nanoseconds(30)).unwrap();
        assert_eq!(removed, ["ppica"]);
        assert!(keeper.has_parachain_ibc_token_info_by_native_denom("uosmo"));

        let removed = begin_blocker(&mut keeper, Timestamp::from_nanoseconds(60)).unwrap();
        assert_eq!(removed, ["uosmo"]);
    }

    #[test]
    fn unknown_token_is_skipped_unless_strict() {
        let mut lenient = keeper();
        lenient
            .add_to_remove_list("ghost".to_string(), Timestamp::from_nanoseconds(1))
            .unwrap();
        assert!(begin_blocker(&mut lenient, Timestamp::from_nanoseconds(2))
            .unwrap()
            .is_empty());
        assert!(lenient.remove_list().unwrap().is_empty());

        let mut strict = keeper().with_strict_removals(true);
        strict
            .add_to_remove_list("ghost".to_string(), Timestamp::from_nanoseconds(1))
            .unwrap();
        assert!(matches!(
            begin_blocker(&mut strict, Timestamp::from_nanoseconds(2)),
            Err(TransferMiddlewareError::NotFound { .. })
        ));
        assert_eq!(strict.remove_list().unwrap().len(), 1);
    }
}
