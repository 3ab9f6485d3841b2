//! Soroban implementations of the engine's collaborators.

use soroban_sdk::{token, Address, Env, IntoVal, Symbol, TryFromVal, Val};

use crate::{
    error::AccrualError,
    gateway::{AssetGateway, Clock},
    ledger::AccountStore,
    ttl::extend_persistent,
};

/// A Stellar token whose custody account is the running contract.
pub struct TokenGateway<'a> {
    client: token::Client<'a>,
}

impl<'a> TokenGateway<'a> {
    pub fn new(env: &Env, token: &Address) -> Self {
        TokenGateway {
            client: token::Client::new(env, token),
        }
    }

    pub fn address(&self) -> &Address {
        &self.client.address
    }

    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), AccrualError> {
        let amount = i128::try_from(amount).map_err(|_| AccrualError::ArithmeticOverflow)?;
        match self.client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(AccrualError::GatewayTransferFailed),
        }
    }
}

impl AssetGateway<Address> for TokenGateway<'_> {
    fn pool(&self) -> Address {
        self.client.env.current_contract_address()
    }

    fn balance_of(&self, holder: &Address) -> u128 {
        // Token balances are never negative.
        u128::try_from(self.client.balance(holder)).unwrap_or_default()
    }

    fn transfer_in(&mut self, from: &Address, amount: u128) -> Result<(), AccrualError> {
        self.transfer(from, &self.pool(), amount)
    }

    fn transfer_out(&mut self, to: &Address, amount: u128) -> Result<(), AccrualError> {
        self.transfer(&self.pool(), to, amount)
    }
}

/// Ledger close time.
pub struct LedgerClock<'a>(pub &'a Env);

impl Clock for LedgerClock<'_> {
    fn now(&self) -> u64 {
        self.0.ledger().timestamp()
    }
}

/// Per-account records in persistent storage, keyed by `(prefix, account)`.
pub struct PersistentStore {
    env: Env,
    prefix: Symbol,
}

impl PersistentStore {
    pub fn new(env: &Env, prefix: Symbol) -> Self {
        PersistentStore {
            env: env.clone(),
            prefix,
        }
    }
}

impl<R> AccountStore<Address, R> for PersistentStore
where
    R: IntoVal<Env, Val> + TryFromVal<Env, Val> + Default,
{
    fn load(&self, account: &Address) -> R {
        let key = (self.prefix.clone(), account.clone());
        match self.env.storage().persistent().get::<_, R>(&key) {
            Some(record) => {
                extend_persistent(&self.env, &key);
                record
            }
            None => R::default(),
        }
    }

    fn save(&mut self, account: &Address, record: &R) {
        let key = (self.prefix.clone(), account.clone());
        self.env.storage().persistent().set(&key, record);
        extend_persistent(&self.env, &key);
    }
}
