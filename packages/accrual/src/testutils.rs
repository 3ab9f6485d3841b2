use std::{cell::RefCell, collections::BTreeMap, rc::Rc, vec::Vec};

use crate::{
    error::AccrualError,
    gateway::{AssetGateway, Clock},
    ledger::{AccountStore, Position},
};

pub type Account = &'static str;

pub const POOL: Account = "pool";

#[derive(Clone, Debug, Default)]
pub struct MemoryStore<R> {
    records: BTreeMap<Account, R>,
}

impl<R: Clone + Default> AccountStore<Account, R> for MemoryStore<R> {
    fn load(&self, account: &Account) -> R {
        self.records.get(account).cloned().unwrap_or_default()
    }

    fn save(&mut self, account: &Account, record: &R) {
        self.records.insert(*account, record.clone());
    }
}

impl<R: Clone> MemoryStore<R> {
    pub fn records(&self) -> Vec<R> {
        self.records.values().cloned().collect()
    }
}

/// Store shared with a gateway, so the gateway can look at what the engine committed.
#[derive(Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<MemoryStore<Position>>>);

impl AccountStore<Account, Position> for SharedStore {
    fn load(&self, account: &Account) -> Position {
        self.0.borrow().load(account)
    }

    fn save(&mut self, account: &Account, record: &Position) {
        self.0.borrow_mut().save(account, record);
    }
}

/// Token ledger with a single custody account, [`POOL`].
#[derive(Clone, Debug, Default)]
pub struct MemoryAsset {
    balances: BTreeMap<Account, u128>,
    pub rejects_transfers: bool,
}

impl MemoryAsset {
    pub fn mint(&mut self, to: Account, amount: u128) {
        *self.balances.entry(to).or_default() += amount;
    }

    fn move_balance(&mut self, from: Account, to: Account, amount: u128) -> Result<(), AccrualError> {
        if self.rejects_transfers {
            return Err(AccrualError::GatewayTransferFailed);
        }
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(AccrualError::GatewayTransferFailed);
        }
        self.balances.insert(from, from_balance - amount);
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }
}

impl AssetGateway<Account> for MemoryAsset {
    fn pool(&self) -> Account {
        POOL
    }

    fn balance_of(&self, holder: &Account) -> u128 {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    fn transfer_in(&mut self, from: &Account, amount: u128) -> Result<(), AccrualError> {
        self.move_balance(*from, POOL, amount)
    }

    fn transfer_out(&mut self, to: &Account, amount: u128) -> Result<(), AccrualError> {
        self.move_balance(POOL, *to, amount)
    }
}

/// Reward asset that records the payee's committed position at the moment it is paid.
pub struct ObservingAsset {
    pub asset: MemoryAsset,
    pub store: SharedStore,
    pub observed: Vec<Position>,
}

impl AssetGateway<Account> for ObservingAsset {
    fn pool(&self) -> Account {
        POOL
    }

    fn balance_of(&self, holder: &Account) -> u128 {
        self.asset.balance_of(holder)
    }

    fn transfer_in(&mut self, from: &Account, amount: u128) -> Result<(), AccrualError> {
        self.asset.transfer_in(from, amount)
    }

    fn transfer_out(&mut self, to: &Account, amount: u128) -> Result<(), AccrualError> {
        self.observed.push(self.store.load(to));
        self.asset.transfer_out(to, amount)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock(pub u64);

impl ManualClock {
    pub fn advance(&mut self, seconds: u64) {
        self.0 += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0
    }
}
