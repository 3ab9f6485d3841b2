use soroban_sdk::{Env, IntoVal, Val};

// Ledgers close roughly every five seconds.
pub const DAY_IN_LEDGERS: u32 = 17280;

// Instance storage (config, pool state) is kept alive for a week.
pub const INSTANCE_TARGET_TTL: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_RENEWAL_THRESHOLD: u32 = INSTANCE_TARGET_TTL - DAY_IN_LEDGERS;

// Account records are kept alive for thirty days after they were last touched.
pub const PERSISTENT_TARGET_TTL: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_RENEWAL_THRESHOLD: u32 = PERSISTENT_TARGET_TTL - DAY_IN_LEDGERS;

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_RENEWAL_THRESHOLD, INSTANCE_TARGET_TTL);
}

pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage().persistent().extend_ttl(
        key,
        PERSISTENT_RENEWAL_THRESHOLD,
        PERSISTENT_TARGET_TTL,
    );
}
