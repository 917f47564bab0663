#![no_std]

//! Position NFT manager.
//!
//! Each token stands for liquidity the manager holds in one pool range. Pools
//! only ever see the manager as the position owner; the manager keeps the
//! per-token liquidity so tokens sharing a range stay independent.

mod enumeration;
mod storage;

use clmm_types::{Error, FactoryClient, MintParams, PoolClient, TokenPosition};
use soroban_sdk::xdr::{ScErrorCode, ScErrorType};
use soroban_sdk::{
    contract, contractimpl, log, panic_with_error, Address, Env, InvokeError, Symbol, Vec,
};
use storage::{
    get_factory, get_token, get_token_owner, get_total_supply, remove_token, set_factory,
    set_token, set_token_owner, set_total_supply, take_next_token_id,
};

#[contract]
pub struct ClmmPositionNft;

#[contractimpl]
impl ClmmPositionNft {
    pub fn __constructor(env: Env, factory: Address) {
        set_factory(&env, &factory);
    }

    /// Add liquidity through the factory's pool for (token_a, token_b, fee)
    /// and mint a token for it to `params.owner`.
    ///
    /// The owner pays both tokens. Pool errors surface unchanged.
    ///
    /// # Returns
    /// The new token id. Ids start at 0 and are never reused.
    pub fn mint(env: Env, params: MintParams) -> Result<u32, Error> {
        params.owner.require_auth();

        let factory = FactoryClient::new(&env, &get_factory(&env));
        let pool = factory
            .get_pool(&params.token_a, &params.token_b, &params.fee)
            .ok_or(Error::PoolNotFound)?;
        let pool_client = PoolClient::new(&env, &pool);

        // Pools take amounts in canonical (token0, token1) order
        let (amount0_desired, amount1_desired, amount0_min, amount1_min) =
            if params.token_a == pool_client.config().token0 {
                (
                    params.amount_a_desired,
                    params.amount_b_desired,
                    params.amount_a_min,
                    params.amount_b_min,
                )
            } else {
                (
                    params.amount_b_desired,
                    params.amount_a_desired,
                    params.amount_b_min,
                    params.amount_a_min,
                )
            };

        let manager = env.current_contract_address();
        let (liquidity, amount0, amount1) = forward(&env, pool_client.try_mint(
            &manager,
            &params.owner,
            &params.tick_lower,
            &params.tick_upper,
            &amount0_desired,
            &amount1_desired,
            &amount0_min,
            &amount1_min,
        ))?;

        let token_id = take_next_token_id(&env);
        let position = TokenPosition {
            pool: pool.clone(),
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            liquidity,
        };
        set_token(&env, token_id, &position, &params.owner);
        enumeration::add_token_to_owner(&env, &params.owner, token_id);
        set_total_supply(&env, get_total_supply(&env) + 1);

        log!(&env, "mint", token_id, params.owner, pool, liquidity);
        env.events().publish(
            (Symbol::new(&env, "mint"), params.owner),
            (
                token_id,
                pool,
                params.tick_lower,
                params.tick_upper,
                liquidity,
                amount0,
                amount1,
            ),
        );

        Ok(token_id)
    }

    /// Withdraw all of a token's liquidity to its owner and destroy the token
    ///
    /// # Returns
    /// (amount0, amount1) paid out, in the pool's canonical token order
    pub fn burn(env: Env, token_id: u32, caller: Address) -> Result<(u128, u128), Error> {
        caller.require_auth();

        let position = get_token(&env, token_id)?;
        let owner = get_token_owner(&env, token_id)?;
        if owner != caller {
            return Err(Error::NotOwner);
        }

        let pool_client = PoolClient::new(&env, &position.pool);
        let manager = env.current_contract_address();
        let (amount0, amount1) = forward(&env, pool_client.try_burn(
            &manager,
            &position.tick_lower,
            &position.tick_upper,
            &position.liquidity,
        ))?;

        // Skip collect when the burn credited nothing
        if amount0 > 0 || amount1 > 0 {
            forward(&env, pool_client.try_collect(
                &manager,
                &owner,
                &position.tick_lower,
                &position.tick_upper,
                &amount0,
                &amount1,
            ))?;
        }

        remove_token(&env, token_id);
        enumeration::remove_token_from_owner(&env, &owner, token_id);
        set_total_supply(&env, get_total_supply(&env) - 1);

        log!(&env, "burn", token_id, owner, amount0, amount1);
        env.events().publish(
            (Symbol::new(&env, "burn"), owner),
            (token_id, position.liquidity, amount0, amount1),
        );

        Ok((amount0, amount1))
    }

    /// Move a token to a new owner
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u32) -> Result<(), Error> {
        from.require_auth();

        let owner = get_token_owner(&env, token_id)?;
        if owner != from {
            return Err(Error::NotOwner);
        }
        if from == to {
            return Ok(());
        }

        set_token_owner(&env, token_id, &to);
        enumeration::remove_token_from_owner(&env, &from, token_id);
        enumeration::add_token_to_owner(&env, &to, token_id);

        env.events()
            .publish((Symbol::new(&env, "transfer"), from, to), token_id);

        Ok(())
    }

    // === Read-only ===

    /// Number of live tokens
    pub fn total_supply(env: Env) -> u32 {
        get_total_supply(&env)
    }

    pub fn balance_of(env: Env, owner: Address) -> u32 {
        enumeration::balance_of(&env, &owner)
    }

    /// Token ids held by `owner`. Burns and transfers out move the last
    /// entry into the vacated slot.
    pub fn tokens_of_owner(env: Env, owner: Address) -> Vec<u32> {
        enumeration::tokens_of_owner(&env, &owner)
    }

    pub fn token_of_owner_by_index(env: Env, owner: Address, index: u32) -> Option<u32> {
        enumeration::token_at(&env, &owner, index)
    }

    pub fn owner_of(env: Env, token_id: u32) -> Result<Address, Error> {
        get_token_owner(&env, token_id)
    }

    /// (pool, tick_lower, tick_upper) a token points at
    pub fn token_id_to_position(env: Env, token_id: u32) -> Result<(Address, i32, i32), Error> {
        let position = get_token(&env, token_id)?;
        Ok((position.pool, position.tick_lower, position.tick_upper))
    }

    pub fn token_position(env: Env, token_id: u32) -> Result<TokenPosition, Error> {
        get_token(&env, token_id)
    }

    pub fn factory(env: Env) -> Address {
        get_factory(&env)
    }
}

/// Unwrap a `try_` pool call, handing pool errors back to our caller as is.
/// Anything that is not one of our errors traps again with the original code.
fn forward<T, C>(
    env: &Env,
    result: Result<Result<T, C>, Result<Error, InvokeError>>,
) -> Result<T, Error> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(error)) => Err(error),
        Err(Err(InvokeError::Contract(code))) => {
            panic_with_error!(env, soroban_sdk::Error::from_contract_error(code))
        }
        Err(Err(InvokeError::Abort)) => panic_with_error!(
            env,
            soroban_sdk::Error::from_type_and_code(ScErrorType::Context, ScErrorCode::InvalidAction)
        ),
        Ok(Err(_)) => panic_with_error!(
            env,
            soroban_sdk::Error::from_type_and_code(ScErrorType::Value, ScErrorCode::UnexpectedType)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_factory::testutils::register_pool;
    use clmm_factory::ClmmFactory;
    use clmm_pool::{ClmmPool, ClmmPoolClient};
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::token::{StellarAssetClient, TokenClient};
    use soroban_sdk::{vec, BytesN};

    const E18: i128 = 1_000_000_000_000_000_000;

    const LOWER_A: i32 = 84220;
    const UPPER_A: i32 = 86130;
    const LIQUIDITY_A: u128 = 1514719247706887470328;
    const MINT_A: (i128, i128) = (997568936312316998, 4999999999999999999998);
    const BURN_A: (u128, u128) = (997568936312316996, 4999999999999999999997);

    const LOWER_B: i32 = 82220;
    const UPPER_B: i32 = 87130;
    const LIQUIDITY_B: u128 = 51464042095613188684;
    const BURN_B: (u128, u128) = (67734498276575541, 499999999999999999990);

    const FUNDING: i128 = 1_000_000 * E18;

    struct Setup<'a> {
        env: Env,
        nft: ClmmPositionNftClient<'a>,
        pool: ClmmPoolClient<'a>,
        factory: Address,
        token0: TokenClient<'a>,
        token1: TokenClient<'a>,
        alice: Address,
        bob: Address,
    }

    impl<'a> Setup<'a> {
        fn params(
            &self,
            owner: &Address,
            lower: i32,
            upper: i32,
            amount0: i128,
            amount1: i128,
        ) -> MintParams {
            MintParams {
                owner: owner.clone(),
                token_a: self.token0.address.clone(),
                token_b: self.token1.address.clone(),
                fee: 500,
                tick_lower: lower,
                tick_upper: upper,
                amount_a_desired: amount0,
                amount_b_desired: amount1,
                amount_a_min: 0,
                amount_b_min: 0,
            }
        }

        fn params_a(&self, owner: &Address) -> MintParams {
            self.params(owner, LOWER_A, UPPER_A, E18, 5000 * E18)
        }

        fn params_b(&self, owner: &Address) -> MintParams {
            self.params(owner, LOWER_B, UPPER_B, E18 / 10, 500 * E18)
        }
    }

    /// Factory, a registered 0.05% pool (uninitialized) and a funded alice and bob
    fn setup_uninitialized<'a>() -> Setup<'a> {
        let env = Env::default();
        env.mock_all_auths();
        env.cost_estimate().budget().reset_unlimited();

        let admin = Address::generate(&env);
        let token_a = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let token_b = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let (token0, token1) = clmm_types::sort_tokens(token_a, token_b);

        let factory = env.register(ClmmFactory, (admin, BytesN::from_array(&env, &[0u8; 32])));
        let pool_id = env.register(
            ClmmPool,
            (factory.clone(), token0.clone(), token1.clone(), 500u32, 10i32),
        );
        register_pool(&env, &factory, &token0, &token1, 500, &pool_id);

        let nft_id = env.register(ClmmPositionNft, (factory.clone(),));

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        for user in [&alice, &bob] {
            StellarAssetClient::new(&env, &token0).mint(user, &FUNDING);
            StellarAssetClient::new(&env, &token1).mint(user, &FUNDING);
        }

        Setup {
            nft: ClmmPositionNftClient::new(&env, &nft_id),
            pool: ClmmPoolClient::new(&env, &pool_id),
            factory,
            token0: TokenClient::new(&env, &token0),
            token1: TokenClient::new(&env, &token1),
            alice,
            bob,
            env,
        }
    }

    fn setup<'a>() -> Setup<'a> {
        let s = setup_uninitialized();
        s.pool.initialize(&5000);
        s
    }

    // === Mint ===

    #[test]
    fn test_constructor_stores_factory() {
        let s = setup();
        assert_eq!(s.nft.factory(), s.factory);
        assert_eq!(s.nft.total_supply(), 0);
    }

    #[test]
    fn test_mint_registers_token() {
        let s = setup();

        let id = s.nft.mint(&s.params_a(&s.alice));
        assert_eq!(id, 0);
        assert_eq!(s.nft.total_supply(), 1);
        assert_eq!(s.nft.tokens_of_owner(&s.alice), vec![&s.env, 0]);
        assert_eq!(s.nft.owner_of(&0), s.alice);
        assert_eq!(
            s.nft.token_id_to_position(&0),
            (s.pool.address.clone(), LOWER_A, UPPER_A)
        );
        assert_eq!(s.nft.token_position(&0).liquidity, LIQUIDITY_A);

        // alice pays, the manager owns the pool position
        assert_eq!(s.token0.balance(&s.alice), FUNDING - MINT_A.0);
        assert_eq!(s.token1.balance(&s.alice), FUNDING - MINT_A.1);
        assert_eq!(
            s.pool.positions(&s.nft.address, &LOWER_A, &UPPER_A).liquidity,
            LIQUIDITY_A
        );
        assert_eq!(
            s.pool.positions(&s.alice, &LOWER_A, &UPPER_A),
            clmm_types::PositionInfo::default()
        );
    }

    #[test]
    fn test_mint_second_token_appends() {
        let s = setup();
        s.nft.mint(&s.params_a(&s.alice));

        let id = s.nft.mint(&s.params_b(&s.alice));
        assert_eq!(id, 1);
        assert_eq!(s.nft.total_supply(), 2);
        assert_eq!(s.nft.tokens_of_owner(&s.alice), vec![&s.env, 0, 1]);
        assert_eq!(s.nft.token_position(&1).liquidity, LIQUIDITY_B);
        assert_eq!(s.nft.balance_of(&s.alice), 2);
        assert_eq!(s.nft.token_of_owner_by_index(&s.alice, &1), Some(1));
        assert_eq!(s.nft.token_of_owner_by_index(&s.alice, &2), None);
    }

    #[test]
    fn test_mint_accepts_tokens_in_either_order() {
        let s = setup();

        let mut params = s.params_a(&s.alice);
        params.token_a = s.token1.address.clone();
        params.token_b = s.token0.address.clone();
        params.amount_a_desired = 5000 * E18;
        params.amount_b_desired = E18;

        let id = s.nft.mint(&params);
        assert_eq!(s.nft.token_position(&id).liquidity, LIQUIDITY_A);
        assert_eq!(s.token0.balance(&s.alice), FUNDING - MINT_A.0);
        assert_eq!(s.token1.balance(&s.alice), FUNDING - MINT_A.1);
    }

    #[test]
    fn test_mint_unknown_pool() {
        let s = setup();

        let mut params = s.params_a(&s.alice);
        params.fee = 3000;
        assert_eq!(s.nft.try_mint(&params), Err(Ok(Error::PoolNotFound)));
        assert_eq!(s.nft.total_supply(), 0);
    }

    #[test]
    fn test_mint_forwards_pool_errors() {
        let s = setup_uninitialized();
        assert_eq!(
            s.nft.try_mint(&s.params_a(&s.alice)),
            Err(Ok(Error::Uninitialized))
        );

        s.pool.initialize(&5000);
        let inverted = s.params(&s.alice, UPPER_A, LOWER_A, E18, 5000 * E18);
        assert_eq!(s.nft.try_mint(&inverted), Err(Ok(Error::InvalidRange)));

        let mut greedy = s.params_a(&s.alice);
        greedy.amount_b_min = 5000 * E18;
        assert_eq!(s.nft.try_mint(&greedy), Err(Ok(Error::SlippageExceeded)));

        // failed mints consume no id
        assert_eq!(s.nft.total_supply(), 0);
        assert_eq!(s.nft.mint(&s.params_a(&s.alice)), 0);
    }

    #[test]
    fn test_mint_underfunded_owner() {
        let s = setup();
        let poor = Address::generate(&s.env);
        StellarAssetClient::new(&s.env, &s.token0.address).mint(&poor, &1);

        assert_eq!(
            s.nft.try_mint(&s.params_a(&poor)),
            Err(Ok(Error::TransferFailed))
        );
        assert_eq!(s.nft.total_supply(), 0);
        assert!(s.nft.tokens_of_owner(&poor).is_empty());
        assert_eq!(s.token0.balance(&poor), 1);
    }

    #[test]
    fn test_forward_passes_values_and_errors() {
        let env = Env::default();
        let ok: Result<Result<u32, ()>, Result<Error, InvokeError>> = Ok(Ok(7));
        assert_eq!(forward(&env, ok), Ok(7));

        let failed: Result<Result<u32, ()>, Result<Error, InvokeError>> =
            Err(Ok(Error::InvalidRange));
        assert_eq!(forward(&env, failed), Err(Error::InvalidRange));
    }

    #[test]
    #[should_panic]
    fn test_forward_traps_on_foreign_contract_error() {
        let env = Env::default();
        let foreign: Result<Result<u32, ()>, Result<Error, InvokeError>> =
            Err(Err(InvokeError::Contract(10)));
        let _ = forward(&env, foreign);
    }

    #[test]
    #[should_panic]
    fn test_forward_traps_on_abort() {
        let env = Env::default();
        let aborted: Result<Result<u32, ()>, Result<Error, InvokeError>> =
            Err(Err(InvokeError::Abort));
        let _ = forward(&env, aborted);
    }

    // === Burn ===

    #[test]
    fn test_burn_pays_owner_and_swap_removes() {
        let s = setup();
        s.nft.mint(&s.params_a(&s.alice));
        s.nft.mint(&s.params_b(&s.alice));
        let before0 = s.token0.balance(&s.alice);
        let before1 = s.token1.balance(&s.alice);

        let amounts = s.nft.burn(&0, &s.alice);
        assert_eq!(amounts, BURN_A);
        assert_eq!(s.token0.balance(&s.alice), before0 + BURN_A.0 as i128);
        assert_eq!(s.token1.balance(&s.alice), before1 + BURN_A.1 as i128);

        assert_eq!(s.nft.total_supply(), 1);
        assert_eq!(s.nft.tokens_of_owner(&s.alice), vec![&s.env, 1]);
        assert_eq!(
            s.nft.try_token_id_to_position(&0),
            Err(Ok(Error::UnknownToken))
        );
        assert_eq!(s.nft.try_owner_of(&0), Err(Ok(Error::UnknownToken)));
        assert_eq!(
            s.pool.positions(&s.nft.address, &LOWER_A, &UPPER_A),
            clmm_types::PositionInfo::default()
        );

        assert_eq!(s.nft.burn(&1, &s.alice), BURN_B);
        assert_eq!(s.nft.total_supply(), 0);
        assert!(s.nft.tokens_of_owner(&s.alice).is_empty());
    }

    #[test]
    fn test_burn_first_of_three_moves_last() {
        let s = setup();
        for _ in 0..3 {
            s.nft.mint(&s.params_b(&s.alice));
        }

        s.nft.burn(&0, &s.alice);
        assert_eq!(s.nft.tokens_of_owner(&s.alice), vec![&s.env, 2, 1]);
        assert_eq!(s.nft.token_of_owner_by_index(&s.alice, &0), Some(2));
    }

    #[test]
    fn test_burn_errors() {
        let s = setup();
        assert_eq!(s.nft.try_burn(&0, &s.alice), Err(Ok(Error::UnknownToken)));

        s.nft.mint(&s.params_a(&s.alice));
        assert_eq!(s.nft.try_burn(&0, &s.bob), Err(Ok(Error::NotOwner)));

        s.nft.burn(&0, &s.alice);
        assert_eq!(s.nft.try_burn(&0, &s.alice), Err(Ok(Error::UnknownToken)));
    }

    #[test]
    fn test_tokens_on_same_range_are_independent() {
        let s = setup();
        s.nft.mint(&s.params_a(&s.alice));
        s.nft.mint(&s.params_a(&s.bob));
        assert_eq!(
            s.pool.positions(&s.nft.address, &LOWER_A, &UPPER_A).liquidity,
            2 * LIQUIDITY_A
        );

        assert_eq!(s.nft.burn(&0, &s.alice), BURN_A);
        let shared = s.pool.positions(&s.nft.address, &LOWER_A, &UPPER_A);
        assert_eq!(shared.liquidity, LIQUIDITY_A);
        assert_eq!(shared.tokens_owed_0, 0);
        assert_eq!(shared.tokens_owed_1, 0);

        assert_eq!(s.nft.burn(&1, &s.bob), BURN_A);
        assert_eq!(s.token0.balance(&s.bob), FUNDING - MINT_A.0 + BURN_A.0 as i128);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let s = setup();
        s.nft.mint(&s.params_a(&s.alice));
        s.nft.burn(&0, &s.alice);

        assert_eq!(s.nft.mint(&s.params_a(&s.alice)), 1);
        assert_eq!(s.nft.total_supply(), 1);
        assert_eq!(s.nft.tokens_of_owner(&s.alice), vec![&s.env, 1]);
    }

    // === Transfer ===

    #[test]
    fn test_transfer_moves_ownership() {
        let s = setup();
        s.nft.mint(&s.params_a(&s.alice));
        s.nft.mint(&s.params_b(&s.alice));

        s.nft.transfer(&s.alice, &s.bob, &0);
        assert_eq!(s.nft.owner_of(&0), s.bob);
        assert_eq!(s.nft.tokens_of_owner(&s.alice), vec![&s.env, 1]);
        assert_eq!(s.nft.tokens_of_owner(&s.bob), vec![&s.env, 0]);
        assert_eq!(s.nft.total_supply(), 2);

        // only the new holder can burn, and is paid
        assert_eq!(s.nft.try_burn(&0, &s.alice), Err(Ok(Error::NotOwner)));
        let before = s.token1.balance(&s.bob);
        s.nft.burn(&0, &s.bob);
        assert_eq!(s.token1.balance(&s.bob), before + BURN_A.1 as i128);
    }

    #[test]
    fn test_transfer_errors() {
        let s = setup();
        assert_eq!(
            s.nft.try_transfer(&s.alice, &s.bob, &0),
            Err(Ok(Error::UnknownToken))
        );

        s.nft.mint(&s.params_a(&s.alice));
        assert_eq!(
            s.nft.try_transfer(&s.bob, &s.alice, &0),
            Err(Ok(Error::NotOwner))
        );

        // self transfer keeps the list as is
        s.nft.transfer(&s.alice, &s.alice, &0);
        assert_eq!(s.nft.tokens_of_owner(&s.alice), vec![&s.env, 0]);
    }
}
