use accrual::{ttl::extend_instance, ShareVault as VaultLedger};
use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol};

use crate::error::ContractError;

/// Prefix of the per-account share balances.
pub const SHARES: Symbol = symbol_short!("SHARES");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token held by the vault
    pub token: Address,
}

pub mod utils {
    use super::*;

    use soroban_sdk::{ConversionError, TryFromVal, Val};

    #[derive(Clone, Copy)]
    #[repr(u32)]
    pub enum DataKey {
        Config = 0,
        Vault = 1,
        Initialized = 2,
    }

    impl TryFromVal<Env, DataKey> for Val {
        type Error = ConversionError;

        fn try_from_val(_env: &Env, v: &DataKey) -> Result<Self, Self::Error> {
            Ok((*v as u32).into())
        }
    }

    pub fn is_initialized(e: &Env) -> bool {
        e.storage()
            .instance()
            .get(&DataKey::Initialized)
            .unwrap_or(false)
    }

    pub fn set_initialized(e: &Env) {
        e.storage().instance().set(&DataKey::Initialized, &true);
        extend_instance(e);
    }

    pub fn save_config(e: &Env, config: &Config) {
        e.storage().instance().set(&DataKey::Config, config);
        extend_instance(e);
    }

    pub fn get_config(e: &Env) -> Result<Config, ContractError> {
        extend_instance(e);
        e.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or_else(|| {
                log!(e, "Vault: Config not set");
                ContractError::NotInitialized
            })
    }

    pub fn get_vault(e: &Env) -> VaultLedger {
        extend_instance(e);
        e.storage()
            .instance()
            .get(&DataKey::Vault)
            .unwrap_or_default()
    }

    pub fn save_vault(e: &Env, vault: &VaultLedger) {
        e.storage().instance().set(&DataKey::Vault, vault);
        extend_instance(e);
    }
}
