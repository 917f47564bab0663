use soroban_sdk::{contracttype, Address};

/// Current price slot - the only pool state a price change touches
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Slot0 {
    /// Current sqrt(price) as Q64.96, non-zero once initialized
    pub sqrt_price_x96: u128,
    /// Tick containing the current price
    pub tick: i32,
    /// False until the pool price has been set
    pub initialized: bool,
}

impl Slot0 {
    pub fn new(sqrt_price_x96: u128, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
            initialized: true,
        }
    }
}

/// Liquidity and fee accumulators - stored in Instance storage
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolState {
    /// Total liquidity of positions whose range contains the current tick
    pub liquidity: u128,
    /// Fee growth global for token0 (Q128.128)
    pub fee_growth_global_0_x128: u128,
    /// Fee growth global for token1 (Q128.128)
    pub fee_growth_global_1_x128: u128,
}

/// Pool configuration - immutable after construction
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Factory that deployed the pool
    pub factory: Address,
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Fee tier in hundredths of bps
    pub fee: u32,
    /// Tick spacing for this pool
    pub tick_spacing: i32,
    /// Maximum liquidity per tick
    pub max_liquidity_per_tick: u128,
}
