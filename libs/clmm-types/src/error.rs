use soroban_sdk::contracterror;

/// Failure conditions shared by the pool, factory and position NFT contracts.
///
/// Codes are stable: a pool error surfaced through the position manager keeps
/// the code it was raised with. They start at 100 so they never collide with
/// the token contract's own error codes.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Pool price has not been set yet
    Uninitialized = 100,
    /// Pool price was already set
    AlreadyInitialized = 101,
    /// Price is zero or outside the representable sqrt price range
    InvalidPrice = 102,
    /// Ticks inverted, misaligned to the spacing or outside the tick bounds
    InvalidRange = 103,
    /// Deposit fell below the caller's minimum amounts
    SlippageExceeded = 104,
    /// No position exists for the (owner, tick_lower, tick_upper) key
    PositionNotFound = 105,
    /// Factory has no pool for the (token_a, token_b, fee) triple
    PoolNotFound = 106,
    /// Token id was never minted or has been burned
    UnknownToken = 107,
    /// Caller does not hold the token
    NotOwner = 108,
    /// Burn exceeds the liquidity held by the position
    InsufficientLiquidity = 109,
    /// Desired amounts are too small to mint any liquidity
    ZeroLiquidity = 110,
    /// Tick or pool liquidity would exceed its ceiling
    LiquidityOverflow = 111,
    /// Negative token amount supplied
    InvalidAmount = 112,
    /// Both sides of the pair are the same token
    IdenticalTokens = 113,
    /// Pool tokens were not supplied in canonical order
    InvalidTokenOrder = 114,
    /// Fee tier has no tick spacing configured
    FeeNotEnabled = 115,
    /// A pool already exists for the canonical (token0, token1, fee) key
    PoolAlreadyExists = 116,
    /// Fee tier is already configured
    FeeAlreadyEnabled = 117,
    /// Tick spacing outside 1..=MAX_TICK_SPACING
    InvalidTickSpacing = 118,
    /// Fee at or above 100%
    InvalidFee = 119,
    /// Tick outside [MIN_TICK, MAX_TICK]
    TickOutOfBounds = 120,
    /// Sqrt price outside [MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96)
    SqrtPriceOutOfBounds = 121,
    /// Fixed-point result does not fit in 128 bits
    MathOverflow = 122,
    /// Fixed-point division by zero
    DivisionByZero = 123,
    /// Token contract refused a transfer, e.g. the payer's balance is too low
    TransferFailed = 124,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_clear_of_token_errors() {
        // Stellar asset contract errors use the low range, e.g. #10 for balance
        assert_eq!(Error::Uninitialized as u32, 100);
        assert_eq!(Error::InsufficientLiquidity as u32, 109);
        assert_eq!(Error::TransferFailed as u32, 124);
        assert_eq!(
            soroban_sdk::Error::from(Error::InsufficientLiquidity),
            soroban_sdk::Error::from_contract_error(109)
        );
    }
}
