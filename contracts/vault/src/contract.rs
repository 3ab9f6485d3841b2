use accrual::{
    host::{PersistentStore, TokenGateway},
    AccrualError,
};
use soroban_sdk::{contract, contractimpl, contractmeta, log, Address, Env};

use crate::{
    error::ContractError,
    msg::ConfigResponse,
    storage::{
        utils::{get_config, get_vault, is_initialized, save_config, save_vault, set_initialized},
        Config, SHARES,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Accrual share vault"
);

#[contract]
pub struct ShareVault;

pub trait ShareVaultTrait {
    fn initialize(env: Env, token: Address) -> Result<(), ContractError>;

    // Deposits `amount` of the vault token, returns the minted shares
    fn enter(env: Env, sender: Address, amount: u128) -> Result<u128, ContractError>;

    // Burns `shares`, returns the amount of vault token paid out
    fn leave(env: Env, sender: Address, shares: u128) -> Result<u128, ContractError>;

    fn transfer_shares(
        env: Env,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), ContractError>;

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError>;

    fn query_shares(env: Env, address: Address) -> Result<u128, ContractError>;

    fn query_total_shares(env: Env) -> Result<u128, ContractError>;

    fn query_total_assets(env: Env) -> Result<u128, ContractError>;

    fn preview_enter(env: Env, amount: u128) -> Result<u128, ContractError>;

    fn preview_leave(env: Env, shares: u128) -> Result<u128, ContractError>;
}

#[contractimpl]
impl ShareVaultTrait for ShareVault {
    fn initialize(env: Env, token: Address) -> Result<(), ContractError> {
        if is_initialized(&env) {
            log!(
                &env,
                "Vault: Initialize: initializing contract twice is not allowed"
            );
            return Err(ContractError::AlreadyInitialized);
        }

        set_initialized(&env);
        save_config(
            &env,
            &Config {
                token: token.clone(),
            },
        );
        save_vault(&env, &Default::default());

        env.events().publish(("initialize", "Share vault"), &token);

        Ok(())
    }

    fn enter(env: Env, sender: Address, amount: u128) -> Result<u128, ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut vault = get_vault(&env);
        let mut shares = PersistentStore::new(&env, SHARES);
        let mut token = TokenGateway::new(&env, &config.token);

        let minted = vault
            .enter(&mut shares, &mut token, &sender, amount)
            .map_err(|err| rejected(&env, err))?;
        save_vault(&env, &vault);

        env.events().publish(("enter", "user"), &sender);
        env.events().publish(("enter", "amount"), amount);
        env.events().publish(("enter", "shares"), minted);

        Ok(minted)
    }

    fn leave(env: Env, sender: Address, shares: u128) -> Result<u128, ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut vault = get_vault(&env);
        let mut balances = PersistentStore::new(&env, SHARES);
        let mut token = TokenGateway::new(&env, &config.token);

        let returned = vault
            .leave(&mut balances, &mut token, &sender, shares)
            .map_err(|err| rejected(&env, err))?;
        save_vault(&env, &vault);

        env.events().publish(("leave", "user"), &sender);
        env.events().publish(("leave", "shares"), shares);
        env.events().publish(("leave", "amount"), returned);

        Ok(returned)
    }

    fn transfer_shares(
        env: Env,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), ContractError> {
        from.require_auth();

        get_config(&env)?;
        let mut balances = PersistentStore::new(&env, SHARES);

        get_vault(&env)
            .transfer_shares(&mut balances, &from, &to, amount)
            .map_err(|err| rejected(&env, err))?;

        env.events().publish(("transfer_shares", "from"), &from);
        env.events().publish(("transfer_shares", "to"), &to);
        env.events().publish(("transfer_shares", "amount"), amount);

        Ok(())
    }

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError> {
        Ok(ConfigResponse {
            config: get_config(&env)?,
        })
    }

    fn query_shares(env: Env, address: Address) -> Result<u128, ContractError> {
        get_config(&env)?;
        let shares = PersistentStore::new(&env, SHARES);

        Ok(get_vault(&env).shares_of(&shares, &address))
    }

    fn query_total_shares(env: Env) -> Result<u128, ContractError> {
        get_config(&env)?;
        Ok(get_vault(&env).total_shares)
    }

    fn query_total_assets(env: Env) -> Result<u128, ContractError> {
        let config = get_config(&env)?;
        let token = TokenGateway::new(&env, &config.token);

        Ok(get_vault(&env).total_assets(&token))
    }

    fn preview_enter(env: Env, amount: u128) -> Result<u128, ContractError> {
        let config = get_config(&env)?;
        let token = TokenGateway::new(&env, &config.token);

        get_vault(&env)
            .preview_enter(&token, amount)
            .map_err(|err| rejected(&env, err))
    }

    fn preview_leave(env: Env, shares: u128) -> Result<u128, ContractError> {
        let config = get_config(&env)?;
        let token = TokenGateway::new(&env, &config.token);

        get_vault(&env)
            .preview_leave(&token, shares)
            .map_err(|err| rejected(&env, err))
    }
}

fn rejected(env: &Env, err: AccrualError) -> ContractError {
    log!(env, "Vault: request rejected with error {}", err as u32);
    err.into()
}
