use crate::error::AccrualError;

/// Moves one fungible asset in and out of the pool's custody.
///
/// The engine only ever calls a gateway after it has settled its own bookkeeping, so an
/// implementation that calls back into the pool sees balances that are already final.
pub trait AssetGateway<A> {
    /// The account that holds the pool's custody of this asset.
    fn pool(&self) -> A;

    fn balance_of(&self, holder: &A) -> u128;

    /// Pulls `amount` from `from` into the pool.
    fn transfer_in(&mut self, from: &A, amount: u128) -> Result<(), AccrualError>;

    /// Pays `amount` out of the pool to `to`.
    fn transfer_out(&mut self, to: &A, amount: u128) -> Result<(), AccrualError>;

    fn pool_balance(&self) -> u128 {
        self.balance_of(&self.pool())
    }
}

/// Monotonic source of the current time, in seconds.
pub trait Clock {
    fn now(&self) -> u64;
}

pub trait AccessControl<A> {
    fn is_owner(&self, caller: &A) -> bool;
}

/// Access control with exactly one privileged account.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SingleOwner<A>(pub A);

impl<A: PartialEq> AccessControl<A> for SingleOwner<A> {
    fn is_owner(&self, caller: &A) -> bool {
        self.0 == *caller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_owner_only_recognises_itself() {
        let owner = SingleOwner("owner");
        assert!(owner.is_owner(&"owner"));
        assert!(!owner.is_owner(&"alice"));
    }
}
