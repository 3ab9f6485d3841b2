use soroban_sdk::contracttype;

use crate::error::AccrualError;

/// Per-account record shared by the reward models.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    /// Amount of the staking asset currently deposited.
    pub staked: u128,
    /// Atomics of the reward accumulator at the account's last checkpoint.
    pub reward_checkpoint: u128,
    /// Rewards settled at a checkpoint but not paid out yet.
    pub unclaimed: u128,
}

/// Loads and saves one record per account.
///
/// An account that was never saved loads as `R::default()`.
pub trait AccountStore<A, R> {
    fn load(&self, account: &A) -> R;

    fn save(&mut self, account: &A, record: &R);
}

/// Staked balances and their running total.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StakeLedger {
    pub total_staked: u128,
}

impl StakeLedger {
    pub fn stake(&mut self, position: &mut Position, amount: u128) -> Result<(), AccrualError> {
        ensure_non_zero(amount)?;
        let staked = position
            .staked
            .checked_add(amount)
            .ok_or(AccrualError::ArithmeticOverflow)?;
        let total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(AccrualError::ArithmeticOverflow)?;

        position.staked = staked;
        self.total_staked = total_staked;
        Ok(())
    }

    pub fn unstake(&mut self, position: &mut Position, amount: u128) -> Result<(), AccrualError> {
        ensure_non_zero(amount)?;
        let staked = position
            .staked
            .checked_sub(amount)
            .ok_or(AccrualError::InsufficientBalance)?;
        let total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(AccrualError::ArithmeticOverflow)?;

        position.staked = staked;
        self.total_staked = total_staked;
        Ok(())
    }
}

pub fn ensure_non_zero(amount: u128) -> Result<(), AccrualError> {
    if amount == 0 {
        return Err(AccrualError::ZeroAmount);
    }
    Ok(())
}

/// Writes the staged pool state and account record, then runs `transfer`.
///
/// If the transfer fails both are put back, so the caller observes no change at all. A gateway
/// invoked from `transfer` already sees the committed (for payouts: zeroed) balances.
pub(crate) fn commit_then_transfer<A, R, T, S, F>(
    state: &mut T,
    staged_state: T,
    records: &mut S,
    account: &A,
    staged_record: &R,
    transfer: F,
) -> Result<(), AccrualError>
where
    S: AccountStore<A, R>,
    F: FnOnce() -> Result<(), AccrualError>,
{
    let previous_state = core::mem::replace(state, staged_state);
    let previous_record = records.load(account);
    records.save(account, staged_record);

    if let Err(err) = transfer() {
        *state = previous_state;
        records.save(account, &previous_record);
        return Err(err);
    }
    Ok(())
}
