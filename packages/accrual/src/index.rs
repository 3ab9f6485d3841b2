//! Lump-sum distribution: every funding event bumps a global reward index once, in proportion
//! to the stake present at that moment.

use accrual_decimal::Decimal;
use soroban_sdk::contracttype;

use crate::{
    error::AccrualError,
    gateway::AssetGateway,
    ledger::{commit_then_transfer, ensure_non_zero, AccountStore, Position, StakeLedger},
};

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexPool {
    pub ledger: StakeLedger,
    /// Cumulative reward per staked unit, as [`Decimal`] atomics.
    pub reward_index: u128,
}

impl IndexPool {
    pub fn reward_index(&self) -> Decimal {
        Decimal::raw(self.reward_index)
    }

    pub fn total_staked(&self) -> u128 {
        self.ledger.total_staked
    }

    pub fn staked<A, S>(&self, positions: &S, account: &A) -> u128
    where
        S: AccountStore<A, Position>,
    {
        positions.load(account).staked
    }

    /// Rewards settled at the account's last checkpoint, excluding anything accrued since.
    pub fn unclaimed<A, S>(&self, positions: &S, account: &A) -> u128
    where
        S: AccountStore<A, Position>,
    {
        positions.load(account).unclaimed
    }

    fn pending(&self, position: &Position) -> Result<u128, AccrualError> {
        self.reward_index()
            .checked_sub(Decimal::raw(position.reward_checkpoint))
            .and_then(|delta| delta.mul_floor(position.staked))
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    /// Settles the rewards accrued since the position's last checkpoint into `unclaimed`.
    pub fn checkpoint(&self, position: &mut Position) -> Result<(), AccrualError> {
        let pending = self.pending(position)?;
        position.unclaimed = position
            .unclaimed
            .checked_add(pending)
            .ok_or(AccrualError::ArithmeticOverflow)?;
        position.reward_checkpoint = self.reward_index;
        Ok(())
    }

    pub fn earned(&self, position: &Position) -> Result<u128, AccrualError> {
        position
            .unclaimed
            .checked_add(self.pending(position)?)
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    pub fn calculate_earned<A, S>(&self, positions: &S, account: &A) -> Result<u128, AccrualError>
    where
        S: AccountStore<A, Position>,
    {
        self.earned(&positions.load(account))
    }

    /// Same value as [`IndexPool::calculate_earned`].
    pub fn compute_rewards<A, S>(&self, positions: &S, account: &A) -> Result<u128, AccrualError>
    where
        S: AccountStore<A, Position>,
    {
        self.calculate_earned(positions, account)
    }

    pub fn stake<A, S, G>(
        &mut self,
        positions: &mut S,
        stake_asset: &mut G,
        account: &A,
        amount: u128,
    ) -> Result<(), AccrualError>
    where
        S: AccountStore<A, Position>,
        G: AssetGateway<A>,
    {
        ensure_non_zero(amount)?;
        let mut staged = self.clone();
        let mut position = positions.load(account);
        staged.checkpoint(&mut position)?;
        staged.ledger.stake(&mut position, amount)?;

        commit_then_transfer(self, staged, positions, account, &position, || {
            stake_asset.transfer_in(account, amount)
        })
    }

    pub fn unstake<A, S, G>(
        &mut self,
        positions: &mut S,
        stake_asset: &mut G,
        account: &A,
        amount: u128,
    ) -> Result<(), AccrualError>
    where
        S: AccountStore<A, Position>,
        G: AssetGateway<A>,
    {
        ensure_non_zero(amount)?;
        let mut staged = self.clone();
        let mut position = positions.load(account);
        staged.checkpoint(&mut position)?;
        staged.ledger.unstake(&mut position, amount)?;

        commit_then_transfer(self, staged, positions, account, &position, || {
            stake_asset.transfer_out(account, amount)
        })
    }

    /// Distributes `amount` over everyone staked right now and collects it from `funder`.
    ///
    /// Accounts that stake afterwards earn nothing from this event.
    pub fn fund<A, G>(
        &mut self,
        reward_asset: &mut G,
        funder: &A,
        amount: u128,
    ) -> Result<(), AccrualError>
    where
        G: AssetGateway<A>,
    {
        ensure_non_zero(amount)?;
        if self.ledger.total_staked == 0 {
            return Err(AccrualError::NoStakers);
        }
        let increment = Decimal::from_ratio(amount, self.ledger.total_staked)
            .ok_or(AccrualError::ArithmeticOverflow)?;
        if increment.atomics() == 0 {
            return Err(AccrualError::RewardTooSmall);
        }
        let reward_index = self
            .reward_index()
            .checked_add(increment)
            .ok_or(AccrualError::ArithmeticOverflow)?;

        reward_asset.transfer_in(funder, amount)?;
        self.reward_index = reward_index.atomics();
        Ok(())
    }

    /// Pays out everything `account` has earned and returns the amount.
    pub fn claim_reward<A, S, G>(
        &mut self,
        positions: &mut S,
        reward_asset: &mut G,
        account: &A,
    ) -> Result<u128, AccrualError>
    where
        S: AccountStore<A, Position>,
        G: AssetGateway<A>,
    {
        let mut position = positions.load(account);
        self.checkpoint(&mut position)?;
        let reward = position.unclaimed;
        if reward == 0 {
            return Err(AccrualError::NoRewardsToClaim);
        }
        position.unclaimed = 0;

        let staged = self.clone();
        commit_then_transfer(self, staged, positions, account, &position, || {
            reward_asset.transfer_out(account, reward)
        })?;
        Ok(reward)
    }
}
