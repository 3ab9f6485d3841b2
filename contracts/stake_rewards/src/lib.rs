#![no_std]
mod contract;
mod error;
mod msg;
mod storage;

pub use contract::{RewardStaking, RewardStakingClient};
pub use error::ContractError;
