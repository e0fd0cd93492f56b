//! Load-or-create helpers shared by the handlers

use persistence::{EntityStore, StoreError};
use types::account::{SystemDebt, User};
use types::entity::Provenance;
use types::ids::{self, Address};
use types::vault::{CollateralBalance, CollateralType, Vault};

use crate::context::Ctx;

/// Load a user, creating and saving an empty one on first sight.
pub fn get_or_create_user<S: EntityStore>(store: &mut S, address: Address) -> Result<User, StoreError> {
    if let Some(user) = store.load::<User>(&address.to_hex())? {
        return Ok(user);
    }
    let user = User::new(address);
    store.save(&user)?;
    Ok(user)
}

/// Unlocked collateral of `owner` in `ilk`. Not saved until the caller does.
pub fn load_or_create_balance<S: EntityStore>(
    store: &S,
    owner: Address,
    ilk: &str,
    at: Provenance,
) -> Result<CollateralBalance, StoreError> {
    Ok(store
        .load::<CollateralBalance>(&ids::collateral_balance_id(&owner, ilk))?
        .unwrap_or_else(|| CollateralBalance::new(owner, ilk, at)))
}

pub fn load_or_create_system_debt<S: EntityStore>(
    store: &S,
    holder: &Address,
) -> Result<SystemDebt, StoreError> {
    Ok(store
        .load::<SystemDebt>(&holder.to_hex())?
        .unwrap_or_else(|| SystemDebt::new(holder)))
}

/// Load the vault of `owner` in `collateral_type`, opening an unmanaged one
/// when absent.
///
/// Opening a vault bumps the vault counters of the collateral type and of the
/// system. The second element is `true` when the vault was just opened.
pub fn load_or_open_vault<S: EntityStore>(
    ctx: &mut Ctx<'_, S>,
    owner: Address,
    collateral_type: &mut CollateralType,
) -> Result<(Vault, bool), StoreError> {
    let id = ids::vault_id(&owner, &collateral_type.id);
    if let Some(vault) = ctx.store.load::<Vault>(&id)? {
        return Ok((vault, false));
    }

    let vault = Vault::new(owner, &collateral_type.id, false, ctx.provenance());
    collateral_type.vault_count += 1;
    collateral_type.unmanaged_vault_count += 1;
    ctx.system_mut().unmanaged_vault_count += 1;
    Ok((vault, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::NoChain;
    use crate::config::LedgerConfig;
    use crate::context::EventMeta;
    use persistence::MemoryStore;
    use types::entity::EntityKind;
    use types::ids::TxHash;
    use types::system::SystemState;

    fn at() -> Provenance {
        Provenance::new(1, 10, TxHash::default())
    }

    #[test]
    fn test_user_saved_on_first_sight() {
        let mut store = MemoryStore::new();
        let addr = Address::new([3u8; 20]);
        get_or_create_user(&mut store, addr).unwrap();
        assert_eq!(store.count(EntityKind::User), 1);
        get_or_create_user(&mut store, addr).unwrap();
        assert_eq!(store.count(EntityKind::User), 1);
    }

    #[test]
    fn test_balance_not_saved_until_caller_saves() {
        let store = MemoryStore::new();
        let balance = load_or_create_balance(&store, Address::ZERO, "ETH-A", at()).unwrap();
        assert!(balance.amount.is_zero());
        assert_eq!(store.count(EntityKind::CollateralBalance), 0);
    }

    #[test]
    fn test_opening_vault_bumps_counters_once() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        let config = LedgerConfig::default();
        let meta = EventMeta {
            provenance: at(),
            log_index: 0,
            address: Address::ZERO,
            transaction_from: Address::ZERO,
        };
        let mut ilk = CollateralType::new("ETH-A", at());
        let owner = Address::new([9u8; 20]);

        {
            let mut ctx = Ctx::new(&mut store, &mut system, meta, &config, &NoChain);
            let (vault, opened) = load_or_open_vault(&mut ctx, owner, &mut ilk).unwrap();
            assert!(opened);
            assert!(!vault.managed);
            ctx.store.save(&vault).unwrap();
            let (_, opened) = load_or_open_vault(&mut ctx, owner, &mut ilk).unwrap();
            assert!(!opened);
        }

        assert_eq!(ilk.vault_count, 1);
        assert_eq!(ilk.unmanaged_vault_count, 1);
        assert_eq!(system.unmanaged_vault_count, 1);
    }
}
