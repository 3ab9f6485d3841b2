use accrual::{
    gateway::SingleOwner,
    host::{LedgerClock, PersistentStore, TokenGateway},
    AccrualError, RewardSchedule,
};
use soroban_sdk::{contract, contractimpl, contractmeta, log, Address, Env};

use crate::{
    error::ContractError,
    msg::ConfigResponse,
    storage::{
        utils::{
            get_admin, get_config, get_schedule, is_initialized, save_admin, save_config,
            save_schedule, set_initialized,
        },
        Config, POSITIONS,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Accrual staking with rewards streamed over time"
);

#[contract]
pub struct RewardStaking;

pub trait RewardStakingTrait {
    fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError>;

    fn stake(env: Env, sender: Address, amount: u128) -> Result<(), ContractError>;

    fn withdraw(env: Env, sender: Address, amount: u128) -> Result<(), ContractError>;

    fn claim_rewards(env: Env, sender: Address) -> Result<u128, ContractError>;

    // Admin only. The reward tokens have to be transferred to the contract beforehand.
    fn notify_reward_distribution(
        env: Env,
        sender: Address,
        amount: u128,
        duration: u64,
    ) -> Result<(), ContractError>;

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError>;

    fn query_admin(env: Env) -> Result<Address, ContractError>;

    fn query_staked(env: Env, address: Address) -> Result<u128, ContractError>;

    fn query_total_staked(env: Env) -> Result<u128, ContractError>;

    fn query_reward_rate(env: Env) -> Result<u128, ContractError>;

    fn query_reward_end_time(env: Env) -> Result<u64, ContractError>;

    fn query_last_update_time(env: Env) -> Result<u64, ContractError>;

    // Reward per staked unit accumulated until now, scaled by 10^18
    fn query_reward_per_token(env: Env) -> Result<u128, ContractError>;

    fn calculate_earned(env: Env, address: Address) -> Result<u128, ContractError>;
}

#[contractimpl]
impl RewardStakingTrait for RewardStaking {
    fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        if is_initialized(&env) {
            log!(
                &env,
                "Reward staking: Initialize: initializing contract twice is not allowed"
            );
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            log!(
                &env,
                "Reward staking: Initialize: stake and reward token must be different"
            );
            return Err(ContractError::TokensIdentical);
        }

        set_initialized(&env);
        save_config(
            &env,
            &Config {
                stake_token,
                reward_token: reward_token.clone(),
            },
        );
        save_admin(&env, &admin);
        save_schedule(&env, &RewardSchedule::default());

        env.events()
            .publish(("initialize", "Streaming reward staking"), &reward_token);

        Ok(())
    }

    fn stake(env: Env, sender: Address, amount: u128) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut schedule = get_schedule(&env);
        let mut positions = PersistentStore::new(&env, POSITIONS);
        let mut stake_token = TokenGateway::new(&env, &config.stake_token);

        schedule
            .stake(
                &mut positions,
                &mut stake_token,
                &LedgerClock(&env),
                &sender,
                amount,
            )
            .map_err(|err| rejected(&env, err))?;
        save_schedule(&env, &schedule);

        env.events().publish(("stake", "user"), &sender);
        env.events().publish(("stake", "amount"), amount);

        Ok(())
    }

    fn withdraw(env: Env, sender: Address, amount: u128) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut schedule = get_schedule(&env);
        let mut positions = PersistentStore::new(&env, POSITIONS);
        let mut stake_token = TokenGateway::new(&env, &config.stake_token);

        schedule
            .withdraw(
                &mut positions,
                &mut stake_token,
                &LedgerClock(&env),
                &sender,
                amount,
            )
            .map_err(|err| rejected(&env, err))?;
        save_schedule(&env, &schedule);

        env.events().publish(("withdraw", "user"), &sender);
        env.events().publish(("withdraw", "amount"), amount);

        Ok(())
    }

    fn claim_rewards(env: Env, sender: Address) -> Result<u128, ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut schedule = get_schedule(&env);
        let mut positions = PersistentStore::new(&env, POSITIONS);
        let mut reward_token = TokenGateway::new(&env, &config.reward_token);

        let reward = schedule
            .claim_rewards(
                &mut positions,
                &mut reward_token,
                &LedgerClock(&env),
                &sender,
            )
            .map_err(|err| rejected(&env, err))?;
        save_schedule(&env, &schedule);

        env.events().publish(("claim_rewards", "user"), &sender);
        env.events().publish(("claim_rewards", "amount"), reward);

        Ok(reward)
    }

    fn notify_reward_distribution(
        env: Env,
        sender: Address,
        amount: u128,
        duration: u64,
    ) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let owner = SingleOwner(get_admin(&env)?);
        let mut schedule = get_schedule(&env);
        let reward_token = TokenGateway::new(&env, &config.reward_token);

        schedule
            .notify_reward_distribution(
                &owner,
                &reward_token,
                &LedgerClock(&env),
                &sender,
                amount,
                duration,
            )
            .map_err(|err| rejected(&env, err))?;
        save_schedule(&env, &schedule);

        env.events()
            .publish(("notify_reward_distribution", "amount"), amount);
        env.events()
            .publish(("notify_reward_distribution", "reward_rate"), schedule.reward_rate);
        env.events().publish(
            ("notify_reward_distribution", "reward_end_time"),
            schedule.reward_end_time,
        );

        Ok(())
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
        let positions = PersistentStore::new(&env, POSITIONS);

        Ok(initialized_schedule(&env)?.staked(&positions, &address))
    }

    fn query_total_staked(env: Env) -> Result<u128, ContractError> {
        Ok(initialized_schedule(&env)?.total_staked())
    }

    fn query_reward_rate(env: Env) -> Result<u128, ContractError> {
        Ok(initialized_schedule(&env)?.reward_rate)
    }

    fn query_reward_end_time(env: Env) -> Result<u64, ContractError> {
        Ok(initialized_schedule(&env)?.reward_end_time)
    }

    fn query_last_update_time(env: Env) -> Result<u64, ContractError> {
        Ok(initialized_schedule(&env)?.last_update_time)
    }

    fn query_reward_per_token(env: Env) -> Result<u128, ContractError> {
        initialized_schedule(&env)?
            .reward_per_token(env.ledger().timestamp())
            .map(|reward_per_token| reward_per_token.atomics())
            .map_err(|err| rejected(&env, err))
    }

    fn calculate_earned(env: Env, address: Address) -> Result<u128, ContractError> {
        let positions = PersistentStore::new(&env, POSITIONS);

        initialized_schedule(&env)?
            .calculate_earned(&positions, &address, env.ledger().timestamp())
            .map_err(|err| rejected(&env, err))
    }
}

fn initialized_schedule(env: &Env) -> Result<RewardSchedule, ContractError> {
    get_config(env)?;
    Ok(get_schedule(env))
}

fn rejected(env: &Env, err: AccrualError) -> ContractError {
    log!(env, "Reward staking: request rejected with error {}", err as u32);
    err.into()
}
