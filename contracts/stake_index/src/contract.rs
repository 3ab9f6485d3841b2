use accrual::{
    host::{PersistentStore, TokenGateway},
    AccrualError, IndexPool,
};
use soroban_sdk::{contract, contractimpl, contractmeta, log, Address, Env};

use crate::{
    error::ContractError,
    msg::ConfigResponse,
    storage::{
        utils::{
            get_admin, get_config, get_pool, is_initialized, save_admin, save_config, save_pool,
            set_initialized,
        },
        Config, POSITIONS,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Accrual staking with lump-sum reward distribution"
);

#[contract]
pub struct IndexStaking;

pub trait IndexStakingTrait {
    fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError>;

    fn stake(env: Env, sender: Address, amount: u128) -> Result<(), ContractError>;

    fn unstake(env: Env, sender: Address, amount: u128) -> Result<(), ContractError>;

    // Splits `amount` of the reward token over everyone currently staked
    fn fund_rewards(env: Env, sender: Address, amount: u128) -> Result<(), ContractError>;

    fn claim_reward(env: Env, sender: Address) -> Result<u128, ContractError>;

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError>;

    fn query_admin(env: Env) -> Result<Address, ContractError>;

    fn query_staked(env: Env, address: Address) -> Result<u128, ContractError>;

    fn query_total_staked(env: Env) -> Result<u128, ContractError>;

    fn query_reward_index(env: Env) -> Result<u128, ContractError>;

    // Rewards settled for `address` at its last interaction
    fn query_unclaimed(env: Env, address: Address) -> Result<u128, ContractError>;

    fn calculate_earned(env: Env, address: Address) -> Result<u128, ContractError>;

    fn compute_rewards(env: Env, address: Address) -> Result<u128, ContractError>;
}

#[contractimpl]
impl IndexStakingTrait for IndexStaking {
    fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        if is_initialized(&env) {
            log!(
                &env,
                "Index staking: Initialize: initializing contract twice is not allowed"
            );
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            log!(
                &env,
                "Index staking: Initialize: stake and reward token must be different"
            );
            return Err(ContractError::TokensIdentical);
        }

        set_initialized(&env);
        save_config(
            &env,
            &Config {
                stake_token: stake_token.clone(),
                reward_token,
            },
        );
        save_admin(&env, &admin);
        save_pool(&env, &IndexPool::default());

        env.events()
            .publish(("initialize", "Lump-sum reward index staking"), &stake_token);

        Ok(())
    }

    fn stake(env: Env, sender: Address, amount: u128) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut pool = get_pool(&env);
        let mut positions = PersistentStore::new(&env, POSITIONS);
        let mut stake_token = TokenGateway::new(&env, &config.stake_token);

        pool.stake(&mut positions, &mut stake_token, &sender, amount)
            .map_err(|err| rejected(&env, err))?;
        save_pool(&env, &pool);

        env.events().publish(("stake", "user"), &sender);
        env.events().publish(("stake", "amount"), amount);

        Ok(())
    }

    fn unstake(env: Env, sender: Address, amount: u128) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut pool = get_pool(&env);
        let mut positions = PersistentStore::new(&env, POSITIONS);
        let mut stake_token = TokenGateway::new(&env, &config.stake_token);

        pool.unstake(&mut positions, &mut stake_token, &sender, amount)
            .map_err(|err| rejected(&env, err))?;
        save_pool(&env, &pool);

        env.events().publish(("unstake", "user"), &sender);
        env.events().publish(("unstake", "amount"), amount);

        Ok(())
    }

    fn fund_rewards(env: Env, sender: Address, amount: u128) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut pool = get_pool(&env);
        let mut reward_token = TokenGateway::new(&env, &config.reward_token);

        pool.fund(&mut reward_token, &sender, amount)
            .map_err(|err| rejected(&env, err))?;
        save_pool(&env, &pool);

        env.events().publish(("fund_rewards", "funder"), &sender);
        env.events().publish(("fund_rewards", "amount"), amount);
        env.events()
            .publish(("fund_rewards", "reward_index"), pool.reward_index);

        Ok(())
    }

    fn claim_reward(env: Env, sender: Address) -> Result<u128, ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut pool = get_pool(&env);
        let mut positions = PersistentStore::new(&env, POSITIONS);
        let mut reward_token = TokenGateway::new(&env, &config.reward_token);

        let reward = pool
            .claim_reward(&mut positions, &mut reward_token, &sender)
            .map_err(|err| rejected(&env, err))?;
        save_pool(&env, &pool);

        env.events().publish(("claim_reward", "user"), &sender);
        env.events().publish(("claim_reward", "amount"), reward);

        Ok(reward)
    }

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError> {
        Ok(ConfigResponse {
            config: get_config(&env)?,
        })
    }

    fn query_admin(env: Env) -> Result<Address, ContractError> {
        get_admin(&env)
    }

    fn query_staked(env: Env, address: Address) -> Result<u128, ContractError> {
        get_config(&env)?;
        let positions = PersistentStore::new(&env, POSITIONS);

        Ok(get_pool(&env).staked(&positions, &address))
    }

    fn query_total_staked(env: Env) -> Result<u128, ContractError> {
        get_config(&env)?;
        Ok(get_pool(&env).total_staked())
    }

    fn query_reward_index(env: Env) -> Result<u128, ContractError> {
        get_config(&env)?;
        Ok(get_pool(&env).reward_index)
    }

    fn query_unclaimed(env: Env, address: Address) -> Result<u128, ContractError> {
        get_config(&env)?;
        let positions = PersistentStore::new(&env, POSITIONS);

        Ok(get_pool(&env).unclaimed(&positions, &address))
    }

    fn calculate_earned(env: Env, address: Address) -> Result<u128, ContractError> {
        get_config(&env)?;
        let positions = PersistentStore::new(&env, POSITIONS);

        get_pool(&env)
            .calculate_earned(&positions, &address)
            .map_err(|err| rejected(&env, err))
    }

    fn compute_rewards(env: Env, address: Address) -> Result<u128, ContractError> {
        get_config(&env)?;
        let positions = PersistentStore::new(&env, POSITIONS);

        get_pool(&env)
            .compute_rewards(&positions, &address)
            .map_err(|err| rejected(&env, err))
    }
}

fn rejected(env: &Env, err: AccrualError) -> ContractError {
    log!(env, "Index staking: request rejected with error {}", err as u32);
    err.into()
}
