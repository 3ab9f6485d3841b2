use accrual::{ttl::extend_instance, RewardSchedule};
use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol};

use crate::error::ContractError;

/// Prefix of the per-account [`accrual::ledger::Position`] records.
pub const POSITIONS: Symbol = symbol_short!("POSITION");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token users deposit
    pub stake_token: Address,
    /// Token paid out as reward
    pub reward_token: Address,
}

pub mod utils {
    use super::*;

    use soroban_sdk::{ConversionError, TryFromVal, Val};

    #[derive(Clone, Copy)]
    #[repr(u32)]
    pub enum DataKey {
        Config = 0,
        Admin = 1,
        Schedule = 2,
        Initialized = 3,
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

    pub fn save_admin(e: &Env, address: &Address) {
        e.storage().instance().set(&DataKey::Admin, address);
        extend_instance(e);
    }

    pub fn get_admin(e: &Env) -> Result<Address, ContractError> {
        extend_instance(e);
        e.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or_else(|| {
                log!(e, "Reward staking: Admin not set");
                ContractError::NotInitialized
            })
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
                log!(e, "Reward staking: Config not set");
                ContractError::NotInitialized
            })
    }

    pub fn get_schedule(e: &Env) -> RewardSchedule {
        extend_instance(e);
        e.storage()
            .instance()
            .get(&DataKey::Schedule)
            .unwrap_or_default()
    }

    pub fn save_schedule(e: &Env, schedule: &RewardSchedule) {
        e.storage().instance().set(&DataKey::Schedule, schedule);
        extend_instance(e);
    }
}
