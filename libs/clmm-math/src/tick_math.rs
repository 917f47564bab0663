use clmm_types::{Error, MAX_SQRT_PRICE_X96, MAX_TICK, MIN_SQRT_PRICE_X96, MIN_TICK};
use soroban_sdk::{Env, U256};

/// sqrt(1.0001^-(2^i)) in Q128, indexed by bit i of |tick|
const SQRT_RATIO_STEPS: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

// Q128 constant: 2^128 represented as U256
fn q128(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64))
}

fn u256_max(env: &Env) -> U256 {
    U256::from_parts(env, u64::MAX, u64::MAX, u64::MAX, u64::MAX)
}

/// Calculate sqrt(1.0001^tick) * 2^96
///
/// The Q128 ratio is accumulated for -|tick|, inverted for positive ticks and
/// converted to Q96 rounding up, so the result is strictly increasing in tick.
pub fn tick_to_sqrt_price_x96(env: &Env, tick: i32) -> Result<u128, Error> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(Error::TickOutOfBounds);
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = q128(env);

    for (bit, step) in SQRT_RATIO_STEPS.iter().enumerate() {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = ratio.mul(&U256::from_u128(env, *step)).shr(128);
        }
    }

    if tick > 0 {
        ratio = u256_max(env).div(&ratio);
    }

    let remainder = ratio.rem_euclid(&U256::from_u128(env, 1u128 << 32));
    let mut sqrt_price_x96 = ratio.shr(32).to_u128().ok_or(Error::MathOverflow)?;
    if remainder > U256::from_u32(env, 0) {
        sqrt_price_x96 = sqrt_price_x96
            .checked_add(1)
            .ok_or(Error::MathOverflow)?;
    }

    Ok(sqrt_price_x96)
}

/// Greatest tick whose sqrt price is at or below `sqrt_price_x96`
pub fn sqrt_price_x96_to_tick(env: &Env, sqrt_price_x96: u128) -> Result<i32, Error> {
    if !(MIN_SQRT_PRICE_X96..MAX_SQRT_PRICE_X96).contains(&sqrt_price_x96) {
        return Err(Error::SqrtPriceOutOfBounds);
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;

    while low < high {
        let mid = low + (high - low + 1) / 2;
        if tick_to_sqrt_price_x96(env, mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}
