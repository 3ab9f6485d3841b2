use soroban_sdk::contracterror;

/// Failures of the accounting engine.
///
/// Every operation that returns one of these leaves the pool state, the account records and
/// the asset balances exactly as they were before the call.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AccrualError {
    ZeroAmount = 1,
    /// Not enough stake, shares or pool-held asset for the request.
    InsufficientBalance = 2,
    NoRewardsToClaim = 3,
    /// Lump-sum funding while nothing is staked.
    NoStakers = 4,
    Unauthorized = 5,
    GatewayTransferFailed = 6,
    InvalidDuration = 7,
    /// The funded amount spread over the duration truncates to a zero rate.
    RewardRateTooLow = 8,
    /// The deposit is too small to mint a single share.
    DepositTooSmall = 9,
    ArithmeticOverflow = 10,
    /// The lump sum spread over the current stake truncates to a zero index increment.
    RewardTooSmall = 11,
}
