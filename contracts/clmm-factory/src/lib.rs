#![no_std]

use clmm_types::{sort_tokens, Error, DEFAULT_FEE_TIERS, FEE_DENOMINATOR, MAX_TICK_SPACING};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, xdr::ToXdr, Address, BytesN, Env, Symbol, Vec,
};

#[contract]
pub struct ClmmFactory;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    /// Code every pool is deployed from
    PoolWasmHash,
    /// Enabled fee tier -> tick spacing
    FeeTickSpacing(u32),
    /// Canonical (token0, token1, fee) -> pool
    Pool(Address, Address, u32),
    /// Number of pools in the creation-ordered list
    PoolCount,
    /// Creation index -> pool
    PoolAt(u32),
}

const DAY_IN_LEDGERS: u32 = 17280;
const TTL_BUMP: u32 = 30 * DAY_IN_LEDGERS;

/// Upper bound on a single `pools` page, keeps reads inside the per-tx entry limit
const MAX_PAGE: u32 = 50;

#[contractimpl]
impl ClmmFactory {
    /// Store admin and pool WASM hash, enable the default fee tiers
    pub fn __constructor(env: Env, admin: Address, pool_wasm_hash: BytesN<32>) {
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::PoolWasmHash, &pool_wasm_hash);

        for (fee, tick_spacing) in DEFAULT_FEE_TIERS {
            env.storage()
                .instance()
                .set(&DataKey::FeeTickSpacing(fee), &tick_spacing);
        }

        env.storage().instance().set(&DataKey::PoolCount, &0u32);
        extend_instance_ttl(&env);
    }

    /// Deploy a pool for the pair and fee tier.
    ///
    /// The pool address is derived from the canonical (token0, token1, fee) key,
    /// so the same pair and fee always map to the same address. The pool starts
    /// without a price; call its `initialize` next.
    pub fn create_pool(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Result<Address, Error> {
        if token_a == token_b {
            return Err(Error::IdenticalTokens);
        }
        let (token0, token1) = sort_tokens(token_a, token_b);

        let tick_spacing = Self::fee_tick_spacing(env.clone(), fee);
        if tick_spacing == 0 {
            return Err(Error::FeeNotEnabled);
        }

        let pool_key = DataKey::Pool(token0.clone(), token1.clone(), fee);
        if env.storage().persistent().has(&pool_key) {
            return Err(Error::PoolAlreadyExists);
        }

        let pool_wasm_hash = Self::pool_wasm_hash(env.clone());
        let salt = pool_salt(&env, &token0, &token1, fee);

        let pool_address = env.deployer().with_current_contract(salt).deploy_v2(
            pool_wasm_hash,
            (
                env.current_contract_address(),
                token0.clone(),
                token1.clone(),
                fee,
                tick_spacing,
            ),
        );

        record_pool(&env, &token0, &token1, fee, &pool_address);
        Ok(pool_address)
    }

    /// Pool for the pair and fee tier; token order does not matter
    pub fn get_pool(env: Env, token_a: Address, token_b: Address, fee: u32) -> Option<Address> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let pool_key = DataKey::Pool(token0, token1, fee);
        env.storage().persistent().get(&pool_key)
    }

    /// Address `create_pool` deploys the pool for this pair and fee at,
    /// whether or not it exists yet
    pub fn pool_address(env: Env, token_a: Address, token_b: Address, fee: u32) -> Address {
        let (token0, token1) = sort_tokens(token_a, token_b);
        env.deployer()
            .with_current_contract(pool_salt(&env, &token0, &token1, fee))
            .deployed_address()
    }

    /// Enable a new fee tier
    pub fn enable_fee_amount(env: Env, fee: u32, tick_spacing: i32) -> Result<(), Error> {
        Self::admin(env.clone()).require_auth();

        if fee >= FEE_DENOMINATOR {
            return Err(Error::InvalidFee);
        }
        if tick_spacing <= 0 || tick_spacing > MAX_TICK_SPACING {
            return Err(Error::InvalidTickSpacing);
        }

        let key = DataKey::FeeTickSpacing(fee);
        if env.storage().instance().has(&key) {
            return Err(Error::FeeAlreadyEnabled);
        }

        env.storage().instance().set(&key, &tick_spacing);
        extend_instance_ttl(&env);

        env.events().publish(
            (Symbol::new(&env, "fee_enabled"),),
            (fee, tick_spacing),
        );
        Ok(())
    }

    /// Tick spacing for a fee tier, 0 when the tier is not enabled
    pub fn fee_tick_spacing(env: Env, fee: u32) -> i32 {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::FeeTickSpacing(fee))
            .unwrap_or(0)
    }

    /// Number of pools created so far
    pub fn pool_count(env: Env) -> u32 {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::PoolCount)
            .unwrap_or(0)
    }

    /// Pool created `index`-th, if any
    pub fn pool_at(env: Env, index: u32) -> Option<Address> {
        env.storage().persistent().get(&DataKey::PoolAt(index))
    }

    /// Up to `limit` pools (capped at 50) starting from `start_index`
    pub fn pools(env: Env, start_index: u32, limit: u32) -> Vec<Address> {
        let pool_count = Self::pool_count(env.clone());
        let end_index = start_index
            .saturating_add(limit.min(MAX_PAGE))
            .min(pool_count);

        let mut pools = Vec::new(&env);
        for i in start_index..end_index {
            if let Some(pool) = env.storage().persistent().get(&DataKey::PoolAt(i)) {
                pools.push_back(pool);
            }
        }
        pools
    }

    pub fn admin(env: Env) -> Address {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .unwrap_or_else(|| soroban_sdk::panic_with_error!(&env, Error::Uninitialized))
    }

    pub fn pool_wasm_hash(env: Env) -> BytesN<32> {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::PoolWasmHash)
            .unwrap_or_else(|| soroban_sdk::panic_with_error!(&env, Error::Uninitialized))
    }
}

fn extend_instance_ttl(env: &Env) {
    env.storage().instance().extend_ttl(DAY_IN_LEDGERS, TTL_BUMP);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, DAY_IN_LEDGERS, TTL_BUMP);
}

/// Deployment salt, a hash of the canonical (token0, token1, fee) key
fn pool_salt(env: &Env, token0: &Address, token1: &Address, fee: u32) -> BytesN<32> {
    env.crypto()
        .sha256(&(token0.clone(), token1.clone(), fee).to_xdr(env))
        .to_bytes()
}

/// Register a deployed pool under its canonical key and append it to the list
fn record_pool(env: &Env, token0: &Address, token1: &Address, fee: u32, pool: &Address) {
    let pool_key = DataKey::Pool(token0.clone(), token1.clone(), fee);
    env.storage().persistent().set(&pool_key, pool);
    extend_persistent_ttl(env, &pool_key);

    let pool_count: u32 = env
        .storage()
        .instance()
        .get(&DataKey::PoolCount)
        .unwrap_or(0);

    let pool_at_key = DataKey::PoolAt(pool_count);
    env.storage().persistent().set(&pool_at_key, pool);
    extend_persistent_ttl(env, &pool_at_key);

    env.storage()
        .instance()
        .set(&DataKey::PoolCount, &(pool_count + 1));
    extend_instance_ttl(env);

    log!(env, "pool_created", token0.clone(), token1.clone(), fee);
    env.events().publish(
        (Symbol::new(env, "pool_created"),),
        (token0.clone(), token1.clone(), fee, pool.clone()),
    );
}

/// Test helpers for crates that run pools natively instead of from WASM
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;

    /// Record `pool` in `factory`'s registry as if `create_pool` had deployed it
    pub fn register_pool(
        env: &Env,
        factory: &Address,
        token_a: &Address,
        token_b: &Address,
        fee: u32,
        pool: &Address,
    ) {
        let (token0, token1) = sort_tokens(token_a.clone(), token_b.clone());
        env.as_contract(factory, || record_pool(env, &token0, &token1, fee, pool));
    }
}
