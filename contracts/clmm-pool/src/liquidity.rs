use crate::storage::{
    get_config, get_position, get_slot0, get_state, has_position, set_position, set_state,
};
use crate::tick::{clear as clear_tick, get_fee_growth_inside, update as update_tick};
use clmm_math::{
    add_delta, amounts_for_liquidity, max_liquidity_for_amounts, tick_to_sqrt_price_x96,
};
use clmm_types::{Error, PoolConfig, PositionInfo, PositionKey, Slot0, MAX_TICK, MIN_TICK};
use soroban_sdk::{token, Address, Env, U256};

/// Mint (add) liquidity to a position
///
/// Liquidity is the largest amount the desired deposits can pay for at the
/// current price; the charged amounts round up. Everything is validated before
/// the first write, then tokens are pulled from `payer`.
///
/// Returns (liquidity, amount0, amount1)
#[allow(clippy::too_many_arguments)]
pub fn mint(
    env: &Env,
    owner: Address,
    payer: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_desired: i128,
    amount1_desired: i128,
    amount0_min: i128,
    amount1_min: i128,
) -> Result<(u128, u128, u128), Error> {
    let slot0 = initialized_slot0(env)?;

    if amount0_desired < 0 || amount1_desired < 0 || amount0_min < 0 || amount1_min < 0 {
        return Err(Error::InvalidAmount);
    }

    let config = get_config(env);
    validate_ticks(tick_lower, tick_upper, config.tick_spacing)?;

    let sqrt_ratio_lower = tick_to_sqrt_price_x96(env, tick_lower)?;
    let sqrt_ratio_upper = tick_to_sqrt_price_x96(env, tick_upper)?;

    let liquidity = max_liquidity_for_amounts(
        env,
        slot0.sqrt_price_x96,
        sqrt_ratio_lower,
        sqrt_ratio_upper,
        amount0_desired as u128,
        amount1_desired as u128,
    )?;
    if liquidity == 0 {
        return Err(Error::ZeroLiquidity);
    }

    let (amount0, amount1) = amounts_for_liquidity(
        env,
        slot0.sqrt_price_x96,
        sqrt_ratio_lower,
        sqrt_ratio_upper,
        liquidity,
        true,
    )?;

    if amount0 < amount0_min as u128 || amount1 < amount1_min as u128 {
        return Err(Error::SlippageExceeded);
    }

    let liquidity_delta = i128::try_from(liquidity).map_err(|_| Error::LiquidityOverflow)?;
    let key = PositionKey {
        owner,
        tick_lower,
        tick_upper,
    };
    modify_position(env, &config, &slot0, &key, liquidity_delta)?;

    // Pull tokens from the payer
    let pool = env.current_contract_address();
    transfer(env, &config.token0, &payer, &pool, amount0)?;
    transfer(env, &config.token1, &payer, &pool, amount1)?;

    Ok((liquidity, amount0, amount1))
}

/// Burn (remove) liquidity from a position
///
/// Amounts round down and are credited to the position's owed balances;
/// nothing leaves the pool until `collect`.
pub fn burn(
    env: &Env,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
) -> Result<(u128, u128), Error> {
    let slot0 = initialized_slot0(env)?;
    let config = get_config(env);
    validate_ticks(tick_lower, tick_upper, config.tick_spacing)?;

    let key = PositionKey {
        owner,
        tick_lower,
        tick_upper,
    };
    if !has_position(env, &key) {
        return Err(Error::PositionNotFound);
    }
    if amount > get_position(env, &key).liquidity {
        return Err(Error::InsufficientLiquidity);
    }

    let sqrt_ratio_lower = tick_to_sqrt_price_x96(env, tick_lower)?;
    let sqrt_ratio_upper = tick_to_sqrt_price_x96(env, tick_upper)?;

    let (amount0, amount1) = amounts_for_liquidity(
        env,
        slot0.sqrt_price_x96,
        sqrt_ratio_lower,
        sqrt_ratio_upper,
        amount,
        false,
    )?;

    let liquidity_delta = i128::try_from(amount).map_err(|_| Error::LiquidityOverflow)?;
    let mut position = modify_position(env, &config, &slot0, &key, -liquidity_delta)?;

    // Credit burned principal to tokens owed
    position.tokens_owed_0 = position
        .tokens_owed_0
        .checked_add(amount0)
        .ok_or(Error::MathOverflow)?;
    position.tokens_owed_1 = position
        .tokens_owed_1
        .checked_add(amount1)
        .ok_or(Error::MathOverflow)?;
    set_position(env, &key, &position);

    Ok((amount0, amount1))
}

/// Collect owed tokens from a position
///
/// Pays min(requested, owed) per token to `recipient`.
pub fn collect(
    env: &Env,
    owner: Address,
    recipient: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_requested: u128,
    amount1_requested: u128,
) -> Result<(u128, u128), Error> {
    let key = PositionKey {
        owner,
        tick_lower,
        tick_upper,
    };
    if !has_position(env, &key) {
        return Err(Error::PositionNotFound);
    }

    let config = get_config(env);
    let mut position = get_position(env, &key);

    let amount0 = amount0_requested.min(position.tokens_owed_0);
    let amount1 = amount1_requested.min(position.tokens_owed_1);

    position.tokens_owed_0 -= amount0;
    position.tokens_owed_1 -= amount1;
    set_position(env, &key, &position);

    let pool = env.current_contract_address();
    transfer(env, &config.token0, &pool, &recipient, amount0)?;
    transfer(env, &config.token1, &pool, &recipient, amount1)?;

    Ok((amount0, amount1))
}

/// Apply a liquidity delta to both boundary ticks, the position and, when the
/// range contains the current tick, the pool's active liquidity.
/// Returns the updated position without persisting owed amounts.
fn modify_position(
    env: &Env,
    config: &PoolConfig,
    slot0: &Slot0,
    key: &PositionKey,
    liquidity_delta: i128,
) -> Result<PositionInfo, Error> {
    let mut state = get_state(env);

    let mut flipped_lower = false;
    let mut flipped_upper = false;
    if liquidity_delta != 0 {
        flipped_lower = update_tick(
            env,
            key.tick_lower,
            slot0.tick,
            liquidity_delta,
            state.fee_growth_global_0_x128,
            state.fee_growth_global_1_x128,
            false, // lower tick
            config.max_liquidity_per_tick,
        )?;
        flipped_upper = update_tick(
            env,
            key.tick_upper,
            slot0.tick,
            liquidity_delta,
            state.fee_growth_global_0_x128,
            state.fee_growth_global_1_x128,
            true, // upper tick
            config.max_liquidity_per_tick,
        )?;
    }

    let (fee_growth_inside_0, fee_growth_inside_1) = get_fee_growth_inside(
        env,
        key.tick_lower,
        key.tick_upper,
        slot0.tick,
        state.fee_growth_global_0_x128,
        state.fee_growth_global_1_x128,
    );

    let position = update_position(
        env,
        key,
        liquidity_delta,
        fee_growth_inside_0,
        fee_growth_inside_1,
    )?;

    // Ticks are only dropped on removal, once nothing references them
    if liquidity_delta < 0 {
        if flipped_lower {
            clear_tick(env, key.tick_lower);
        }
        if flipped_upper {
            clear_tick(env, key.tick_upper);
        }
    }

    if slot0.tick >= key.tick_lower && slot0.tick < key.tick_upper {
        state.liquidity = add_delta(state.liquidity, liquidity_delta)?;
        set_state(env, &state);
    }

    Ok(position)
}

/// Update a position with liquidity change and fee accumulation
fn update_position(
    env: &Env,
    key: &PositionKey,
    liquidity_delta: i128,
    fee_growth_inside_0_x128: u128,
    fee_growth_inside_1_x128: u128,
) -> Result<PositionInfo, Error> {
    let mut position = get_position(env, key);

    let liquidity_next = add_delta(position.liquidity, liquidity_delta)?;

    if position.liquidity > 0 {
        let fees_0 = fees_earned(
            env,
            fee_growth_inside_0_x128.wrapping_sub(position.fee_growth_inside_0_last_x128),
            position.liquidity,
        )?;
        let fees_1 = fees_earned(
            env,
            fee_growth_inside_1_x128.wrapping_sub(position.fee_growth_inside_1_last_x128),
            position.liquidity,
        )?;

        position.tokens_owed_0 = position
            .tokens_owed_0
            .checked_add(fees_0)
            .ok_or(Error::MathOverflow)?;
        position.tokens_owed_1 = position
            .tokens_owed_1
            .checked_add(fees_1)
            .ok_or(Error::MathOverflow)?;
    }

    position.liquidity = liquidity_next;
    position.fee_growth_inside_0_last_x128 = fee_growth_inside_0_x128;
    position.fee_growth_inside_1_last_x128 = fee_growth_inside_1_x128;

    set_position(env, key, &position);
    Ok(position)
}

/// (fee_growth_delta_x128 * liquidity) >> 128
fn fees_earned(env: &Env, fee_growth_delta_x128: u128, liquidity: u128) -> Result<u128, Error> {
    U256::from_u128(env, fee_growth_delta_x128)
        .mul(&U256::from_u128(env, liquidity))
        .shr(128)
        .to_u128()
        .ok_or(Error::MathOverflow)
}

/// Move `amount` of `token`, reporting a refused transfer as `TransferFailed`
/// instead of the token contract's own error code
fn transfer(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    let amount = i128::try_from(amount).map_err(|_| Error::MathOverflow)?;
    match token::Client::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

fn initialized_slot0(env: &Env) -> Result<Slot0, Error> {
    let slot0 = get_slot0(env);
    if !slot0.initialized {
        return Err(Error::Uninitialized);
    }
    Ok(slot0)
}

/// Validate tick parameters
pub fn validate_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Result<(), Error> {
    if tick_lower >= tick_upper
        || tick_lower < MIN_TICK
        || tick_upper > MAX_TICK
        || tick_lower % tick_spacing != 0
        || tick_upper % tick_spacing != 0
    {
        return Err(Error::InvalidRange);
    }
    Ok(())
}
