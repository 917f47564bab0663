//! Cross-contract boundaries.
//!
//! The position NFT contract only talks to pools and the factory through these
//! traits; `#[contractclient]` generates the typed clients (including the
//! `try_` variants used to forward pool errors).

use crate::{Error, PoolConfig, PositionInfo, Slot0};
use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "PoolClient")]
pub trait PoolInterface {
    fn config(env: Env) -> PoolConfig;

    fn slot0(env: Env) -> Slot0;

    fn positions(env: Env, owner: Address, tick_lower: i32, tick_upper: i32) -> PositionInfo;

    /// Returns (liquidity, amount0, amount1)
    fn mint(
        env: Env,
        owner: Address,
        payer: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_desired: i128,
        amount1_desired: i128,
        amount0_min: i128,
        amount1_min: i128,
    ) -> Result<(u128, u128, u128), Error>;

    fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128), Error>;

    fn collect(
        env: Env,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), Error>;
}

#[contractclient(name = "FactoryClient")]
pub trait FactoryInterface {
    fn get_pool(env: Env, token_a: Address, token_b: Address, fee: u32) -> Option<Address>;
}
