use accrual::AccrualError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 600,
    NotInitialized = 601,
    TokensIdentical = 602,
    ZeroAmount = 603,
    InsufficientBalance = 604,
    NoRewardsToClaim = 605,
    NoStakers = 606,
    TransferFailed = 607,
    RewardTooSmall = 608,
    ArithmeticOverflow = 609,
    /// Engine failure that lump-sum staking never produces
    UnsupportedRequest = 610,
}

impl From<AccrualError> for ContractError {
    fn from(err: AccrualError) -> Self {
        match err {
            AccrualError::ZeroAmount => ContractError::ZeroAmount,
            AccrualError::InsufficientBalance => ContractError::InsufficientBalance,
            AccrualError::NoRewardsToClaim => ContractError::NoRewardsToClaim,
            AccrualError::NoStakers => ContractError::NoStakers,
            AccrualError::GatewayTransferFailed => ContractError::TransferFailed,
            AccrualError::RewardTooSmall => ContractError::RewardTooSmall,
            AccrualError::ArithmeticOverflow => ContractError::ArithmeticOverflow,
            _ => ContractError::UnsupportedRequest,
        }
    }
}
