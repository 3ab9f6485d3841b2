#![no_std]
mod contract;
mod error;
mod msg;
mod storage;

pub use contract::{IndexStaking, IndexStakingClient};
pub use error::ContractError;
