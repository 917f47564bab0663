#![no_std]

mod error;
mod interface;
mod pool;
mod position;
mod tick;

pub use error::*;
pub use interface::*;
pub use pool::*;
pub use position::*;
pub use tick::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Limited so that every sqrt price fits in a u128
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
pub const MAX_TICK: i32 = 443636;

/// Sqrt price at MIN_TICK, sqrt(1.0001^-443636) * 2^96
pub const MIN_SQRT_PRICE_X96: u128 = 18447090764788882728;

/// Sqrt price at MAX_TICK, sqrt(1.0001^443636) * 2^96
pub const MAX_SQRT_PRICE_X96: u128 = 340275971719517849884101479065584693834;

/// Fee amount in hundredths of a basis point (1e-6)
/// 500 = 0.05%, 3000 = 0.3%, 10000 = 1%
pub type Fee = u32;

/// Fee tiers every factory enables at construction: (fee, tick spacing)
pub const DEFAULT_FEE_TIERS: [(Fee, i32); 3] = [(500, 10), (3000, 60), (10000, 200)];

/// Largest tick spacing a fee tier may use
pub const MAX_TICK_SPACING: i32 = 16384;

/// Fees are expressed in millionths and must stay below 100%
pub const FEE_DENOMINATOR: Fee = 1_000_000;

/// Maximum liquidity_gross any single tick may carry for a given spacing.
/// Spreads u128::MAX evenly over every usable tick so the in-range sum can't overflow.
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}

/// Order two token addresses canonically (lower address first)
pub fn sort_tokens(
    token_a: soroban_sdk::Address,
    token_b: soroban_sdk::Address,
) -> (soroban_sdk::Address, soroban_sdk::Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{Address, Env};

    #[test]
    fn test_max_liquidity_shrinks_with_finer_spacing() {
        let fine = max_liquidity_per_tick(10);
        let coarse = max_liquidity_per_tick(200);
        assert!(coarse > fine);
    }

    #[test]
    fn test_max_liquidity_spacing_one_covers_every_tick() {
        let expected = u128::MAX / ((MAX_TICK - MIN_TICK) as u128 + 1);
        assert_eq!(max_liquidity_per_tick(1), expected);
    }

    #[test]
    fn test_default_fee_tiers_have_valid_spacing() {
        for (fee, spacing) in DEFAULT_FEE_TIERS {
            assert!(fee < FEE_DENOMINATOR);
            assert!(spacing > 0 && spacing <= MAX_TICK_SPACING);
        }
    }

    #[test]
    fn test_sort_tokens_is_order_insensitive() {
        let env = Env::default();
        let a = Address::generate(&env);
        let b = Address::generate(&env);

        let ab = sort_tokens(a.clone(), b.clone());
        let ba = sort_tokens(b, a);
        assert_eq!(ab, ba);
        assert!(ab.0 < ab.1);
    }
}
