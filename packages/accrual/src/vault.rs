//! Share vault: deposits mint shares against the vault's current asset balance, so anything
//! the vault receives on top of deposits raises the value of every share.

use accrual_decimal::mul_div;
use soroban_sdk::contracttype;

use crate::{
    error::AccrualError,
    gateway::AssetGateway,
    ledger::{commit_then_transfer, ensure_non_zero, AccountStore},
};

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShareVault {
    pub total_shares: u128,
}

impl ShareVault {
    pub fn shares_of<A, S>(&self, shares: &S, account: &A) -> u128
    where
        S: AccountStore<A, u128>,
    {
        shares.load(account)
    }

    /// Assets currently held by the vault.
    pub fn total_assets<A, G: AssetGateway<A>>(&self, asset: &G) -> u128 {
        asset.pool_balance()
    }

    /// Shares that depositing `amount` would mint right now.
    pub fn preview_enter<A, G>(&self, asset: &G, amount: u128) -> Result<u128, AccrualError>
    where
        G: AssetGateway<A>,
    {
        let total_assets = asset.pool_balance();
        if self.total_shares == 0 || total_assets == 0 {
            return Ok(amount);
        }
        mul_div(amount, self.total_shares, total_assets).ok_or(AccrualError::ArithmeticOverflow)
    }

    /// Assets that burning `shares` would return right now.
    pub fn preview_leave<A, G>(&self, asset: &G, shares: u128) -> Result<u128, AccrualError>
    where
        G: AssetGateway<A>,
    {
        if shares > self.total_shares {
            return Err(AccrualError::InsufficientBalance);
        }
        if shares == 0 {
            return Ok(0);
        }
        mul_div(shares, asset.pool_balance(), self.total_shares)
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    /// Deposits `amount` and mints shares priced on the balance held before the deposit.
    pub fn enter<A, S, G>(
        &mut self,
        shares: &mut S,
        asset: &mut G,
        account: &A,
        amount: u128,
    ) -> Result<u128, AccrualError>
    where
        S: AccountStore<A, u128>,
        G: AssetGateway<A>,
    {
        ensure_non_zero(amount)?;
        let minted = self.preview_enter(asset, amount)?;
        if minted == 0 {
            return Err(AccrualError::DepositTooSmall);
        }
        let balance = shares
            .load(account)
            .checked_add(minted)
            .ok_or(AccrualError::ArithmeticOverflow)?;
        let staged = ShareVault {
            total_shares: self
                .total_shares
                .checked_add(minted)
                .ok_or(AccrualError::ArithmeticOverflow)?,
        };

        commit_then_transfer(self, staged, shares, account, &balance, || {
            asset.transfer_in(account, amount)
        })?;
        Ok(minted)
    }

    /// Burns `share_amount` and pays out the matching slice of the vault.
    pub fn leave<A, S, G>(
        &mut self,
        shares: &mut S,
        asset: &mut G,
        account: &A,
        share_amount: u128,
    ) -> Result<u128, AccrualError>
    where
        S: AccountStore<A, u128>,
        G: AssetGateway<A>,
    {
        ensure_non_zero(share_amount)?;
        let balance = shares
            .load(account)
            .checked_sub(share_amount)
            .ok_or(AccrualError::InsufficientBalance)?;
        let assets = self.preview_leave(asset, share_amount)?;
        let staged = ShareVault {
            total_shares: self.total_shares - share_amount,
        };

        commit_then_transfer(self, staged, shares, account, &balance, || {
            asset.transfer_out(account, assets)
        })?;
        Ok(assets)
    }

    pub fn transfer_shares<A, S>(
        &self,
        shares: &mut S,
        from: &A,
        to: &A,
        amount: u128,
    ) -> Result<(), AccrualError>
    where
        A: PartialEq,
        S: AccountStore<A, u128>,
    {
        ensure_non_zero(amount)?;
        let from_balance = shares
            .load(from)
            .checked_sub(amount)
            .ok_or(AccrualError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let to_balance = shares
            .load(to)
            .checked_add(amount)
            .ok_or(AccrualError::ArithmeticOverflow)?;

        shares.save(from, &from_balance);
        shares.save(to, &to_balance);
        Ok(())
    }
}
