use accrual::AccrualError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 700,
    NotInitialized = 701,
    TokensIdentical = 702,
    ZeroAmount = 703,
    InsufficientBalance = 704,
    NoRewardsToClaim = 705,
    Unauthorized = 706,
    TransferFailed = 707,
    InvalidDuration = 708,
    RewardRateTooLow = 709,
    ArithmeticOverflow = 710,
    /// Engine failure that streamed staking never produces
    UnsupportedRequest = 711,
}

impl From<AccrualError> for ContractError {
    fn from(err: AccrualError) -> Self {
        match err {
            AccrualError::ZeroAmount => ContractError::ZeroAmount,
            AccrualError::InsufficientBalance => ContractError::InsufficientBalance,
            AccrualError::NoRewardsToClaim => ContractError::NoRewardsToClaim,
            AccrualError::Unauthorized => ContractError::Unauthorized,
            AccrualError::GatewayTransferFailed => ContractError::TransferFailed,
            AccrualError::InvalidDuration => ContractError::InvalidDuration,
            AccrualError::RewardRateTooLow => ContractError::RewardRateTooLow,
            AccrualError::ArithmeticOverflow => ContractError::ArithmeticOverflow,
            _ => ContractError::UnsupportedRequest,
        }
    }
}
