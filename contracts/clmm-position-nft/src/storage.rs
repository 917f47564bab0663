use clmm_types::{Error, TokenPosition};
use soroban_sdk::{contracttype, panic_with_error, Address, Env};

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Factory address (Instance storage)
    Factory,
    /// Next token id, starts at 0 and only grows (Instance storage)
    NextTokenId,
    /// Number of live tokens (Instance storage)
    TotalSupply,
    /// Token id -> TokenPosition
    Token(u32),
    /// Token id -> owner
    TokenOwner(u32),
    /// Owner -> number of tokens held
    OwnerTokenCount(Address),
    /// Owner -> slot -> token id
    OwnerTokenAt(Address, u32),
    /// Token id -> slot in its owner's list
    TokenIndex(u32),
}

const DAY_IN_LEDGERS: u32 = 17280;
const TTL_BUMP: u32 = 30 * DAY_IN_LEDGERS;

fn extend_instance_ttl(env: &Env) {
    env.storage().instance().extend_ttl(DAY_IN_LEDGERS, TTL_BUMP);
}

pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, DAY_IN_LEDGERS, TTL_BUMP);
}

// === Instance ===

pub fn get_factory(env: &Env) -> Address {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .unwrap_or_else(|| panic_with_error!(env, Error::Uninitialized))
}

pub fn set_factory(env: &Env, factory: &Address) {
    env.storage().instance().set(&DataKey::Factory, factory);
    extend_instance_ttl(env);
}

/// Hand out the next token id
pub fn take_next_token_id(env: &Env) -> u32 {
    let id: u32 = env
        .storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::NextTokenId, &(id + 1));
    id
}

pub fn get_total_supply(env: &Env) -> u32 {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: u32) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
    extend_instance_ttl(env);
}

// === Tokens ===

pub fn get_token(env: &Env, token_id: u32) -> Result<TokenPosition, Error> {
    let key = DataKey::Token(token_id);
    let position = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::UnknownToken)?;
    extend_persistent_ttl(env, &key);
    Ok(position)
}

pub fn get_token_owner(env: &Env, token_id: u32) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::TokenOwner(token_id))
        .ok_or(Error::UnknownToken)
}

pub fn set_token(env: &Env, token_id: u32, position: &TokenPosition, owner: &Address) {
    let key = DataKey::Token(token_id);
    env.storage().persistent().set(&key, position);
    extend_persistent_ttl(env, &key);

    set_token_owner(env, token_id, owner);
}

pub fn set_token_owner(env: &Env, token_id: u32, owner: &Address) {
    let key = DataKey::TokenOwner(token_id);
    env.storage().persistent().set(&key, owner);
    extend_persistent_ttl(env, &key);
}

pub fn remove_token(env: &Env, token_id: u32) {
    env.storage().persistent().remove(&DataKey::Token(token_id));
    env.storage()
        .persistent()
        .remove(&DataKey::TokenOwner(token_id));
}
