//! Continuous distribution: a funded amount streams out at a constant rate until the
//! schedule's end time, split over whoever is staked second by second.

use accrual_decimal::Decimal;
use soroban_sdk::contracttype;

use crate::{
    error::AccrualError,
    gateway::{AccessControl, AssetGateway, Clock},
    ledger::{commit_then_transfer, ensure_non_zero, AccountStore, Position, StakeLedger},
};

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardSchedule {
    pub ledger: StakeLedger,
    /// Reward units released per second.
    pub reward_rate: u128,
    pub reward_end_time: u64,
    pub last_update_time: u64,
    /// Accumulated reward per staked unit up to `last_update_time`, as [`Decimal`] atomics.
    pub reward_per_token_stored: u128,
}

impl RewardSchedule {
    pub fn total_staked(&self) -> u128 {
        self.ledger.total_staked
    }

    pub fn staked<A, S>(&self, positions: &S, account: &A) -> u128
    where
        S: AccountStore<A, Position>,
    {
        positions.load(account).staked
    }

    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        now.min(self.reward_end_time)
    }

    /// Accumulator value at `now`, without writing it back.
    pub fn reward_per_token(&self, now: u64) -> Result<Decimal, AccrualError> {
        let stored = Decimal::raw(self.reward_per_token_stored);
        if self.ledger.total_staked == 0 {
            return Ok(stored);
        }
        let elapsed = self
            .last_time_reward_applicable(now)
            .saturating_sub(self.last_update_time);
        let released = self
            .reward_rate
            .checked_mul(elapsed as u128)
            .ok_or(AccrualError::ArithmeticOverflow)?;
        Decimal::from_ratio(released, self.ledger.total_staked)
            .and_then(|increment| stored.checked_add(increment))
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    fn pending(&self, position: &Position, reward_per_token: Decimal) -> Result<u128, AccrualError> {
        reward_per_token
            .checked_sub(Decimal::raw(position.reward_checkpoint))
            .and_then(|delta| delta.mul_floor(position.staked))
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    /// Brings the accumulator up to `now` and, when given, settles `position` against it.
    pub fn update_reward(
        &mut self,
        now: u64,
        position: Option<&mut Position>,
    ) -> Result<(), AccrualError> {
        let reward_per_token = self.reward_per_token(now)?;
        self.reward_per_token_stored = reward_per_token.atomics();
        self.last_update_time = self.last_time_reward_applicable(now);

        if let Some(position) = position {
            let pending = self.pending(position, reward_per_token)?;
            position.unclaimed = position
                .unclaimed
                .checked_add(pending)
                .ok_or(AccrualError::ArithmeticOverflow)?;
            position.reward_checkpoint = self.reward_per_token_stored;
        }
        Ok(())
    }

    pub fn calculate_earned<A, S>(
        &self,
        positions: &S,
        account: &A,
        now: u64,
    ) -> Result<u128, AccrualError>
    where
        S: AccountStore<A, Position>,
    {
        let position = positions.load(account);
        let pending = self.pending(&position, self.reward_per_token(now)?)?;
        position
            .unclaimed
            .checked_add(pending)
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    pub fn stake<A, S, G, C>(
        &mut self,
        positions: &mut S,
        stake_asset: &mut G,
        clock: &C,
        account: &A,
        amount: u128,
    ) -> Result<(), AccrualError>
    where
        S: AccountStore<A, Position>,
        G: AssetGateway<A>,
        C: Clock,
    {
        ensure_non_zero(amount)?;
        let mut staged = self.clone();
        let mut position = positions.load(account);
        staged.update_reward(clock.now(), Some(&mut position))?;
        staged.ledger.stake(&mut position, amount)?;

        commit_then_transfer(self, staged, positions, account, &position, || {
            stake_asset.transfer_in(account, amount)
        })
    }

    pub fn withdraw<A, S, G, C>(
        &mut self,
        positions: &mut S,
        stake_asset: &mut G,
        clock: &C,
        account: &A,
        amount: u128,
    ) -> Result<(), AccrualError>
    where
        S: AccountStore<A, Position>,
        G: AssetGateway<A>,
        C: Clock,
    {
        ensure_non_zero(amount)?;
        let mut staged = self.clone();
        let mut position = positions.load(account);
        staged.update_reward(clock.now(), Some(&mut position))?;
        staged.ledger.unstake(&mut position, amount)?;

        commit_then_transfer(self, staged, positions, account, &position, || {
            stake_asset.transfer_out(account, amount)
        })
    }

    pub fn claim_rewards<A, S, G, C>(
        &mut self,
        positions: &mut S,
        reward_asset: &mut G,
        clock: &C,
        account: &A,
    ) -> Result<u128, AccrualError>
    where
        S: AccountStore<A, Position>,
        G: AssetGateway<A>,
        C: Clock,
    {
        let mut staged = self.clone();
        let mut position = positions.load(account);
        staged.update_reward(clock.now(), Some(&mut position))?;
        let reward = position.unclaimed;
        if reward == 0 {
            return Err(AccrualError::NoRewardsToClaim);
        }
        position.unclaimed = 0;

        commit_then_transfer(self, staged, positions, account, &position, || {
            reward_asset.transfer_out(account, reward)
        })?;
        Ok(reward)
    }

    /// Starts a new window of `duration` seconds releasing `amount` plus whatever the current
    /// window has not released yet.
    ///
    /// The reward tokens must already be held by the pool.
    pub fn notify_reward_distribution<A, P, G, C>(
        &mut self,
        access: &P,
        reward_asset: &G,
        clock: &C,
        caller: &A,
        amount: u128,
        duration: u64,
    ) -> Result<(), AccrualError>
    where
        P: AccessControl<A>,
        G: AssetGateway<A>,
        C: Clock,
    {
        if !access.is_owner(caller) {
            return Err(AccrualError::Unauthorized);
        }
        ensure_non_zero(amount)?;
        if duration == 0 {
            return Err(AccrualError::InvalidDuration);
        }
        if reward_asset.pool_balance() < amount {
            return Err(AccrualError::InsufficientBalance);
        }

        let now = clock.now();
        let mut staged = self.clone();
        staged.update_reward(now, None)?;

        let distributable = if now >= staged.reward_end_time {
            amount
        } else {
            let remaining = staged
                .reward_rate
                .checked_mul((staged.reward_end_time - now) as u128)
                .ok_or(AccrualError::ArithmeticOverflow)?;
            amount
                .checked_add(remaining)
                .ok_or(AccrualError::ArithmeticOverflow)?
        };
        let reward_rate = distributable / duration as u128;
        if reward_rate == 0 {
            return Err(AccrualError::RewardRateTooLow);
        }

        staged.reward_rate = reward_rate;
        staged.reward_end_time = now
            .checked_add(duration)
            .ok_or(AccrualError::ArithmeticOverflow)?;
        staged.last_update_time = now;
        *self = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gateway::SingleOwner,
        testutils::{Account, ManualClock, MemoryAsset, MemoryStore, POOL},
    };
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const DAY: u64 = 86_400;
    const FUNDING: u128 = 86_400_000;

    struct Setup {
        schedule: RewardSchedule,
        positions: MemoryStore<Position>,
        stake_asset: MemoryAsset,
        reward_asset: MemoryAsset,
        clock: ManualClock,
        owner: SingleOwner<Account>,
    }

    fn setup(stakers: &[(Account, u128)]) -> Setup {
        let mut stake_asset = MemoryAsset::default();
        for (account, amount) in stakers {
            stake_asset.mint(*account, *amount);
        }
        Setup {
            schedule: RewardSchedule::default(),
            positions: MemoryStore::default(),
            stake_asset,
            reward_asset: MemoryAsset::default(),
            clock: ManualClock(1_000),
            owner: SingleOwner("admin"),
        }
    }

    impl Setup {
        fn stake(&mut self, account: Account, amount: u128) -> Result<(), AccrualError> {
            self.schedule.stake(
                &mut self.positions,
                &mut self.stake_asset,
                &self.clock,
                &account,
                amount,
            )
        }

        fn withdraw(&mut self, account: Account, amount: u128) -> Result<(), AccrualError> {
            self.schedule.withdraw(
                &mut self.positions,
                &mut self.stake_asset,
                &self.clock,
                &account,
                amount,
            )
        }

        fn claim(&mut self, account: Account) -> Result<u128, AccrualError> {
            self.schedule.claim_rewards(
                &mut self.positions,
                &mut self.reward_asset,
                &self.clock,
                &account,
            )
        }

        /// Sends `amount` to the pool and announces it as `caller`.
        fn fund_as(
            &mut self,
            caller: Account,
            amount: u128,
            duration: u64,
        ) -> Result<(), AccrualError> {
            self.reward_asset.mint(POOL, amount);
            self.schedule.notify_reward_distribution(
                &self.owner,
                &self.reward_asset,
                &self.clock,
                &caller,
                amount,
                duration,
            )
        }

        fn fund(&mut self, amount: u128, duration: u64) -> Result<(), AccrualError> {
            self.fund_as("admin", amount, duration)
        }

        fn earned(&self, account: Account) -> u128 {
            self.schedule
                .calculate_earned(&self.positions, &account, self.clock.0)
                .unwrap()
        }
    }

    #[test]
    fn sole_staker_earns_linearly() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();
        assert_eq!(s.schedule.reward_rate, 1_000);

        s.clock.advance(DAY / 2);
        assert_eq!(s.earned("alice"), FUNDING / 2);

        s.clock.advance(DAY / 2);
        assert_eq!(s.earned("alice"), FUNDING);
    }

    #[test]
    fn rewards_stop_at_end_time() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();

        s.clock.advance(3 * DAY);
        assert_eq!(s.earned("alice"), FUNDING);
        assert_eq!(
            s.schedule.last_time_reward_applicable(s.clock.0),
            s.schedule.reward_end_time
        );
    }

    #[test]
    fn stakers_share_in_proportion_to_stake() {
        let mut s = setup(&[("alice", 300), ("bob", 100)]);
        s.stake("alice", 300).unwrap();
        s.stake("bob", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();

        s.clock.advance(DAY);
        assert_eq!(s.earned("alice"), 64_800_000);
        assert_eq!(s.earned("bob"), 21_600_000);
    }

    #[test]
    fn late_joiner_earns_from_join_time_only() {
        let mut s = setup(&[("alice", 300), ("bob", 100)]);
        s.stake("alice", 300).unwrap();
        s.fund(FUNDING, DAY).unwrap();

        s.clock.advance(DAY / 2);
        s.stake("bob", 100).unwrap();
        assert_eq!(s.earned("bob"), 0);

        s.clock.advance(DAY / 2);
        assert_eq!(s.earned("alice"), 43_200_000 + 32_400_000);
        assert_eq!(s.earned("bob"), 10_800_000);
    }

    #[test]
    fn nothing_accrues_while_pool_is_empty() {
        let mut s = setup(&[("alice", 100)]);
        s.fund(FUNDING, DAY).unwrap();

        s.clock.advance(DAY / 2);
        s.stake("alice", 100).unwrap();
        s.clock.advance(DAY);

        assert_eq!(s.earned("alice"), FUNDING / 2);
    }

    #[test]
    fn fundings_at_the_same_instant_merge() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();
        s.fund(2 * FUNDING, DAY).unwrap();

        assert_eq!(s.schedule.reward_rate, 3 * FUNDING / DAY as u128);
        assert_eq!(s.schedule.reward_end_time, s.clock.0 + DAY);
    }

    #[test]
    fn funding_mid_window_carries_over_the_remainder() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();

        s.clock.advance(DAY / 2);
        s.fund(FUNDING, DAY).unwrap();
        assert_eq!(s.schedule.reward_rate, (FUNDING + FUNDING / 2) / DAY as u128);
        assert_eq!(s.schedule.last_update_time, s.clock.0);

        s.clock.advance(DAY);
        assert_eq!(s.earned("alice"), 2 * FUNDING);
    }

    #[test]
    fn funding_after_the_window_starts_a_fresh_one() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        let started = s.clock.0;
        s.fund(FUNDING, DAY).unwrap();

        s.clock.advance(DAY);
        s.fund(FUNDING, DAY).unwrap();

        assert_eq!(s.schedule.reward_end_time, started + 2 * DAY);
        assert_eq!(s.schedule.reward_rate, FUNDING / DAY as u128);
    }

    #[test]
    fn accumulator_never_decreases() {
        let mut s = setup(&[("alice", 70), ("bob", 30)]);
        let mut previous = 0;
        s.stake("alice", 70).unwrap();
        s.fund(FUNDING, DAY).unwrap();
        for step in 0..6u64 {
            s.clock.advance(DAY / 4);
            if step == 1 {
                s.stake("bob", 30).unwrap();
            }
            if step == 3 {
                s.withdraw("alice", 70).unwrap();
            }
            let current = s.schedule.reward_per_token(s.clock.0).unwrap().atomics();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn claim_pays_out_and_resets() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();
        s.clock.advance(DAY / 2);

        assert_eq!(s.claim("alice"), Ok(FUNDING / 2));
        assert_eq!(s.reward_asset.balance_of(&"alice"), FUNDING / 2);
        assert_eq!(s.positions.load(&"alice").unclaimed, 0);
        assert_eq!(s.claim("alice"), Err(AccrualError::NoRewardsToClaim));

        s.clock.advance(DAY / 2);
        assert_eq!(s.claim("alice"), Ok(FUNDING / 2));
        assert_eq!(s.reward_asset.balance_of(&POOL), 0);
    }

    #[test]
    fn withdraw_keeps_earned_rewards() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();
        s.clock.advance(DAY / 4);

        s.withdraw("alice", 100).unwrap();
        s.clock.advance(DAY / 4);

        assert_eq!(s.earned("alice"), FUNDING / 4);
        assert_eq!(s.stake_asset.balance_of(&"alice"), 100);
        assert_eq!(s.schedule.staked(&s.positions, &"alice"), 0);
        assert_eq!(s.schedule.total_staked(), 0);
    }

    #[test]
    fn failed_payout_is_rolled_back() {
        let mut s = setup(&[("alice", 100)]);
        s.stake("alice", 100).unwrap();
        s.fund(FUNDING, DAY).unwrap();
        s.clock.advance(DAY);
        let snapshot = s.schedule.clone();
        let position = s.positions.load(&"alice");

        s.reward_asset.rejects_transfers = true;
        assert_eq!(s.claim("alice"), Err(AccrualError::GatewayTransferFailed));
        assert_eq!(s.schedule, snapshot);
        assert_eq!(s.positions.load(&"alice"), position);
        assert_eq!(s.earned("alice"), FUNDING);
    }

    #[test]
    fn only_the_owner_can_fund() {
        let mut s = setup(&[]);
        assert_eq!(
            s.fund_as("mallory", FUNDING, DAY),
            Err(AccrualError::Unauthorized)
        );
        assert_eq!(s.schedule, RewardSchedule::default());
    }

    #[test]
    fn funding_requires_the_tokens_in_the_pool() {
        let mut s = setup(&[]);
        let result = s.schedule.notify_reward_distribution(
            &s.owner,
            &s.reward_asset,
            &s.clock,
            &"admin",
            FUNDING,
            DAY,
        );
        assert_eq!(result, Err(AccrualError::InsufficientBalance));
        assert_eq!(s.schedule, RewardSchedule::default());
    }

    #[test_case(0, DAY, Err(AccrualError::ZeroAmount) ; "zero amount")]
    #[test_case(FUNDING, 0, Err(AccrualError::InvalidDuration) ; "zero duration")]
    #[test_case(DAY as u128 - 1, DAY, Err(AccrualError::RewardRateTooLow) ; "rate truncates to zero")]
    #[test_case(DAY as u128, DAY, Ok(()) ; "smallest viable funding")]
    fn funding_parameters(amount: u128, duration: u64, expected: Result<(), AccrualError>) {
        let mut s = setup(&[]);
        assert_eq!(s.fund(amount, duration), expected);
        if expected.is_err() {
            assert_eq!(s.schedule, RewardSchedule::default());
        }
    }

    #[test]
    fn degenerate_stake_requests_are_rejected() {
        let mut s = setup(&[("alice", 10)]);

        assert_eq!(s.stake("alice", 0), Err(AccrualError::ZeroAmount));
        assert_eq!(s.withdraw("alice", 0), Err(AccrualError::ZeroAmount));
        assert_eq!(s.withdraw("alice", 1), Err(AccrualError::InsufficientBalance));
        assert_eq!(s.stake("alice", 11), Err(AccrualError::GatewayTransferFailed));
        assert_eq!(s.schedule, RewardSchedule::default());
        assert_eq!(s.positions.load(&"alice"), Position::default());
    }

    #[test]
    fn payouts_stay_within_funding() {
        let mut s = setup(&[("alice", 7), ("bob", 11), ("carol", 13)]);
        s.stake("alice", 7).unwrap();
        s.stake("bob", 11).unwrap();
        s.fund(FUNDING, DAY).unwrap();
        s.clock.advance(DAY / 3);
        s.stake("carol", 13).unwrap();
        s.clock.advance(DAY);

        let paid: u128 = ["alice", "bob", "carol"]
            .iter()
            .map(|account| s.claim(*account).unwrap())
            .sum();
        assert!(paid <= FUNDING);
        assert!(FUNDING - paid <= 3);
        assert_eq!(s.stake_asset.balance_of(&POOL), s.schedule.total_staked());
    }
}
