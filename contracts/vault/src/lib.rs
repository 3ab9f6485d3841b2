#![no_std]
mod contract;
mod error;
mod msg;
mod storage;

pub use contract::{ShareVault, ShareVaultClient};
pub use error::ContractError;
