use crate::full_math::{mul_div, mul_div_rounding_up};
use clmm_types::Q96;
use clmm_types::Error;
use soroban_sdk::Env;

fn ordered(sqrt_ratio_a_x96: u128, sqrt_ratio_b_x96: u128) -> (u128, u128) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// Amount of token0 between two sqrt prices for a given liquidity
/// delta_x = L * Q96 / sqrt_pa - L * Q96 / sqrt_pb
///
/// Computed as a difference of two quotients so `L * Q96` never has to fit in
/// 128 bits. Rounding up ceils the first term and floors the second, rounding
/// down does the opposite, so the result is within one unit of the exact value.
pub fn get_amount0_delta(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_lower == 0 {
        return Err(Error::DivisionByZero);
    }

    if round_up {
        let high = mul_div_rounding_up(env, liquidity, Q96, sqrt_ratio_lower)?;
        let low = mul_div(env, liquidity, Q96, sqrt_ratio_upper)?;
        Ok(high - low)
    } else {
        let high = mul_div(env, liquidity, Q96, sqrt_ratio_lower)?;
        let low = mul_div_rounding_up(env, liquidity, Q96, sqrt_ratio_upper)?;
        Ok(high.saturating_sub(low))
    }
}

/// Amount of token1 between two sqrt prices for a given liquidity
/// delta_y = L * (sqrt_pb - sqrt_pa) / Q96
pub fn get_amount1_delta(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if round_up {
        mul_div_rounding_up(env, liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
    } else {
        mul_div(env, liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
    }
}
