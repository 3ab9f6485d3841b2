use accrual::AccrualError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 800,
    NotInitialized = 801,
    ZeroAmount = 802,
    InsufficientBalance = 803,
    TransferFailed = 804,
    DepositTooSmall = 805,
    ArithmeticOverflow = 806,
    /// Engine failure that the share vault never produces
    UnsupportedRequest = 807,
}

impl From<AccrualError> for ContractError {
    fn from(err: AccrualError) -> Self {
        match err {
            AccrualError::ZeroAmount => ContractError::ZeroAmount,
            AccrualError::InsufficientBalance => ContractError::InsufficientBalance,
            AccrualError::GatewayTransferFailed => ContractError::TransferFailed,
            AccrualError::DepositTooSmall => ContractError::DepositTooSmall,
            AccrualError::ArithmeticOverflow => ContractError::ArithmeticOverflow,
            _ => ContractError::UnsupportedRequest,
        }
    }
}
