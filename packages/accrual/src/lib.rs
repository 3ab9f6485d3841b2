#![no_std]
//! Reward accounting for staking pools.
//!
//! Three models share one staking ledger: [`IndexPool`] splits lump-sum fundings over the
//! stake present when they arrive, [`RewardSchedule`] streams fundings out over time, and
//! [`ShareVault`] prices deposits against the vault's balance. The models only talk to the
//! outside world through the traits in [`gateway`] and [`ledger`]; [`host`] implements them on
//! top of Soroban storage and Stellar tokens.

#[cfg(test)]
extern crate std;

mod error;
pub mod gateway;
pub mod host;
mod index;
pub mod ledger;
mod schedule;
pub mod ttl;
mod vault;

#[cfg(test)]
mod testutils;

pub use error::AccrualError;
pub use index::IndexPool;
pub use schedule::RewardSchedule;
pub use vault::ShareVault;
