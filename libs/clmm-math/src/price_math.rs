use clmm_types::{Error, MAX_SQRT_PRICE_X96, MIN_SQRT_PRICE_X96};
use soroban_sdk::{Env, U256};

/// Convert a whole-unit price (token1 per token0) to sqrt(price) * 2^96
///
/// Returns floor(sqrt(price * 2^192)). Prices must be non-zero, below 2^64 and
/// map inside [MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96).
pub fn price_to_sqrt_price_x96(env: &Env, price: u128) -> Result<u128, Error> {
    if price == 0 || price > u64::MAX as u128 {
        return Err(Error::InvalidPrice);
    }

    let scaled = U256::from_u128(env, price).shl(192);
    let sqrt_price_x96 = isqrt(env, &scaled)
        .to_u128()
        .ok_or(Error::InvalidPrice)?;

    if !(MIN_SQRT_PRICE_X96..MAX_SQRT_PRICE_X96).contains(&sqrt_price_x96) {
        return Err(Error::InvalidPrice);
    }

    Ok(sqrt_price_x96)
}

/// Integer square root by Newton iteration.
/// Starts at 2^128, which is never below the root of a 256-bit value.
fn isqrt(env: &Env, value: &U256) -> U256 {
    let zero = U256::from_u32(env, 0);
    if *value == zero {
        return zero;
    }

    let mut x = U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64));
    loop {
        let y = x.add(&value.div(&x)).shr(1);
        if y >= x {
            return x;
        }
        x = y;
    }
}
