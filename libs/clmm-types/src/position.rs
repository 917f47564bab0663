use soroban_sdk::{contracttype, Address};

/// Position key for pool-level tracking
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Position info stored in pool contract
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionInfo {
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee growth inside at last update (token0)
    pub fee_growth_inside_0_last_x128: u128,
    /// Fee growth inside at last update (token1)
    pub fee_growth_inside_1_last_x128: u128,
    /// Burned principal and fees not yet collected (token0)
    pub tokens_owed_0: u128,
    /// Burned principal and fees not yet collected (token1)
    pub tokens_owed_1: u128,
}

impl PositionInfo {
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed_0 == 0 && self.tokens_owed_1 == 0
    }
}

/// Pool range and liquidity a position NFT stands for
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenPosition {
    /// Pool contract address
    pub pool: Address,
    /// Lower tick boundary
    pub tick_lower: i32,
    /// Upper tick boundary
    pub tick_upper: i32,
    /// Liquidity minted in the pool for this token
    pub liquidity: u128,
}

/// Mint request accepted by the position NFT contract.
///
/// Token amounts follow the caller's (token_a, token_b) order; the manager maps
/// them onto the pool's canonical (token0, token1) order.
#[contracttype]
#[derive(Clone, Debug)]
pub struct MintParams {
    pub owner: Address,
    pub token_a: Address,
    pub token_b: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount_a_desired: i128,
    pub amount_b_desired: i128,
    pub amount_a_min: i128,
    pub amount_b_min: i128,
}
