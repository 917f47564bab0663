#![no_std]

mod liquidity;
mod storage;
mod tick;

use clmm_math::{price_to_sqrt_price_x96, sqrt_price_x96_to_tick};
use clmm_types::{
    Error, PoolConfig, PoolState, PositionInfo, PositionKey, Slot0, TickInfo, MAX_TICK_SPACING,
};
use soroban_sdk::{contract, contractimpl, log, panic_with_error, Address, Env, Symbol};
use storage::{
    get_config, get_position, get_slot0, get_state, get_tick, set_config, set_slot0, set_state,
};

#[contract]
pub struct ClmmPool;

#[contractimpl]
impl ClmmPool {
    /// Deploy a pool for a canonical (token0, token1, fee) key.
    /// The price stays unset until `initialize`.
    pub fn __constructor(
        env: Env,
        factory: Address,
        token0: Address,
        token1: Address,
        fee: u32,
        tick_spacing: i32,
    ) {
        if token0 >= token1 {
            panic_with_error!(&env, Error::InvalidTokenOrder);
        }
        if tick_spacing <= 0 || tick_spacing > MAX_TICK_SPACING {
            panic_with_error!(&env, Error::InvalidTickSpacing);
        }

        let config = PoolConfig {
            factory,
            token0,
            token1,
            fee,
            tick_spacing,
            max_liquidity_per_tick: clmm_types::max_liquidity_per_tick(tick_spacing),
        };
        set_config(&env, &config);
        set_slot0(&env, &Slot0::default());
        set_state(&env, &PoolState::default());
    }

    /// Set the starting price from a whole-unit price (token1 per token0)
    pub fn initialize(env: Env, price: u128) -> Result<Slot0, Error> {
        if get_slot0(&env).initialized {
            return Err(Error::AlreadyInitialized);
        }
        let sqrt_price_x96 = price_to_sqrt_price_x96(&env, price)?;
        start(&env, sqrt_price_x96)
    }

    /// Set the starting price from a raw Q64.96 sqrt price
    pub fn initialize_sqrt_price(env: Env, sqrt_price_x96: u128) -> Result<Slot0, Error> {
        if get_slot0(&env).initialized {
            return Err(Error::AlreadyInitialized);
        }
        start(&env, sqrt_price_x96)
    }

    /// Add liquidity to `owner`'s position, paid for by `payer`
    ///
    /// # Returns
    /// (liquidity, amount0, amount1) - Liquidity minted and token amounts deposited
    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        env: Env,
        owner: Address,
        payer: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_desired: i128,
        amount1_desired: i128,
        amount0_min: i128,
        amount1_min: i128,
    ) -> Result<(u128, u128, u128), Error> {
        payer.require_auth();

        let (liquidity, amount0, amount1) = liquidity::mint(
            &env,
            owner.clone(),
            payer,
            tick_lower,
            tick_upper,
            amount0_desired,
            amount1_desired,
            amount0_min,
            amount1_min,
        )?;

        log!(&env, "mint", owner, tick_lower, tick_upper, liquidity);
        env.events().publish(
            (Symbol::new(&env, "mint"), owner),
            (tick_lower, tick_upper, liquidity, amount0, amount1),
        );

        Ok((liquidity, amount0, amount1))
    }

    /// Remove liquidity from a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts credited to the position, see `collect`
    pub fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128), Error> {
        owner.require_auth();

        let (amount0, amount1) =
            liquidity::burn(&env, owner.clone(), tick_lower, tick_upper, liquidity)?;

        log!(&env, "burn", owner, tick_lower, tick_upper, liquidity);
        env.events().publish(
            (Symbol::new(&env, "burn"), owner),
            (tick_lower, tick_upper, liquidity, amount0, amount1),
        );

        Ok((amount0, amount1))
    }

    /// Withdraw tokens owed to a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts sent to `recipient`
    pub fn collect(
        env: Env,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), Error> {
        owner.require_auth();

        let (amount0, amount1) = liquidity::collect(
            &env,
            owner.clone(),
            recipient.clone(),
            tick_lower,
            tick_upper,
            amount0_requested,
            amount1_requested,
        )?;

        env.events().publish(
            (Symbol::new(&env, "collect"), owner),
            (recipient, tick_lower, tick_upper, amount0, amount1),
        );

        Ok((amount0, amount1))
    }

    // === View Functions ===

    pub fn slot0(env: Env) -> Slot0 {
        get_slot0(&env)
    }

    pub fn config(env: Env) -> PoolConfig {
        get_config(&env)
    }

    pub fn state(env: Env) -> PoolState {
        get_state(&env)
    }

    /// Position info, zeroed when the position does not exist
    pub fn positions(env: Env, owner: Address, tick_lower: i32, tick_upper: i32) -> PositionInfo {
        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        get_position(&env, &key)
    }

    /// Tick info, zeroed when no position references the tick
    pub fn ticks(env: Env, tick: i32) -> TickInfo {
        get_tick(&env, tick)
    }
}

fn start(env: &Env, sqrt_price_x96: u128) -> Result<Slot0, Error> {
    let tick = sqrt_price_x96_to_tick(env, sqrt_price_x96).map_err(|_| Error::InvalidPrice)?;
    let slot0 = Slot0::new(sqrt_price_x96, tick);
    set_slot0(env, &slot0);

    log!(env, "initialize", sqrt_price_x96, tick);
    env.events().publish(
        (Symbol::new(env, "initialize"),),
        (sqrt_price_x96, tick),
    );

    Ok(slot0)
}
