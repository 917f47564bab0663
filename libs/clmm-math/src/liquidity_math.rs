use crate::full_math::mul_div;
use crate::sqrt_price_math::{get_amount0_delta, get_amount1_delta};
use clmm_types::{Error, Q96};
use soroban_sdk::Env;

fn ordered(sqrt_ratio_a_x96: u128, sqrt_ratio_b_x96: u128) -> (u128, u128) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// Largest liquidity whose rounded-up deposit fits both desired amounts
///
/// Below the range only token0 counts, above it only token1, and in range the
/// smaller of the two single-token liquidities wins. One unit of amount0 is held
/// back because the rounded-up amount0 can exceed its exact value by one.
pub fn max_liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> Result<u128, Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let amount0 = amount0.saturating_sub(1);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        liquidity_for_amount0(env, sqrt_ratio_lower, sqrt_ratio_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let liquidity0 = liquidity_for_amount0(env, sqrt_ratio_x96, sqrt_ratio_upper, amount0)?;
        let liquidity1 = liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_upper, amount1)
    }
}

/// L = amount0 * sqrt_pa * sqrt_pb / (sqrt_pb - sqrt_pa)
fn liquidity_for_amount0(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    amount0: u128,
) -> Result<u128, Error> {
    let intermediate = mul_div(env, sqrt_ratio_lower, sqrt_ratio_upper, Q96)?;
    mul_div(env, amount0, intermediate, sqrt_ratio_upper - sqrt_ratio_lower)
}

/// L = amount1 / (sqrt_pb - sqrt_pa)
fn liquidity_for_amount1(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    amount1: u128,
) -> Result<u128, Error> {
    mul_div(env, amount1, Q96, sqrt_ratio_upper - sqrt_ratio_lower)
}

/// Token amounts a liquidity value stands for over a price range.
/// Round up when charging a depositor, down when paying out.
pub fn amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u128, u128), Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        let amount0 =
            get_amount0_delta(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Ok((amount0, 0))
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let amount0 =
            get_amount0_delta(env, sqrt_ratio_x96, sqrt_ratio_upper, liquidity, round_up)?;
        let amount1 =
            get_amount1_delta(env, sqrt_ratio_lower, sqrt_ratio_x96, liquidity, round_up)?;
        Ok((amount0, amount1))
    } else {
        let amount1 =
            get_amount1_delta(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Ok((0, amount1))
    }
}

/// Add signed liquidity delta to unsigned liquidity
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128, Error> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(Error::InsufficientLiquidity)
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or(Error::LiquidityOverflow)
    }
}
