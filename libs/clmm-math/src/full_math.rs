use clmm_types::Error;
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> Result<u128, Error> {
    if denominator == 0 {
        return Err(Error::DivisionByZero);
    }

    // Product fits in 128 bits
    if let Some(result) = a.fixed_mul_floor(b, denominator) {
        return Ok(result);
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let result = product.div(&U256::from_u128(env, denominator));
    u128_from_u256(&result)
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(
    env: &Env,
    a: u128,
    b: u128,
    denominator: u128,
) -> Result<u128, Error> {
    if denominator == 0 {
        return Err(Error::DivisionByZero);
    }

    if let Some(result) = a.fixed_mul_ceil(b, denominator) {
        return Ok(result);
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let denom_256 = U256::from_u128(env, denominator);
    let result = u128_from_u256(&product.div(&denom_256))?;

    if product.rem_euclid(&denom_256) > U256::from_u32(env, 0) {
        result.checked_add(1).ok_or(Error::MathOverflow)
    } else {
        Ok(result)
    }
}

/// Unsigned division with rounding up
pub fn div_rounding_up(a: u128, b: u128) -> Result<u128, Error> {
    if b == 0 {
        return Err(Error::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    Ok((a - 1) / b + 1)
}

fn u128_from_u256(value: &U256) -> Result<u128, Error> {
    value.to_u128().ok_or(Error::MathOverflow)
}
