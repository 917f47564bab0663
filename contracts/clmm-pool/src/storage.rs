//! Pool storage.
//!
//! Config, slot0 and state sit in instance storage since nearly every call
//! reads them. Ticks and positions get one persistent entry each and are
//! deleted as soon as they hold nothing.

use clmm_types::{Error, PoolConfig, PoolState, PositionInfo, PositionKey, Slot0, TickInfo};
use soroban_sdk::{contracttype, panic_with_error, Env, IntoVal, TryFromVal, Val};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    Slot0,
    State,
    /// tick index -> TickInfo
    Tick(i32),
    /// (owner, lower, upper) -> PositionInfo
    Position(PositionKey),
}

const DAY_IN_LEDGERS: u32 = 17280;
const TTL_BUMP: u32 = 30 * DAY_IN_LEDGERS;

fn extend_instance_ttl(env: &Env) {
    env.storage().instance().extend_ttl(DAY_IN_LEDGERS, TTL_BUMP);
}

fn touch(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, DAY_IN_LEDGERS, TTL_BUMP);
}

fn write_instance<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().instance().set(key, value);
    extend_instance_ttl(env);
}

fn read_instance<V: TryFromVal<Env, Val> + Default>(env: &Env, key: &DataKey) -> V {
    extend_instance_ttl(env);
    env.storage().instance().get(key).unwrap_or_default()
}

// === Config ===

pub fn get_config(env: &Env) -> PoolConfig {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(|| panic_with_error!(env, Error::Uninitialized))
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    write_instance(env, &DataKey::Config, config);
}

/// Unset price reads as the default, uninitialized slot
pub fn get_slot0(env: &Env) -> Slot0 {
    read_instance(env, &DataKey::Slot0)
}

pub fn set_slot0(env: &Env, slot0: &Slot0) {
    write_instance(env, &DataKey::Slot0, slot0);
}

pub fn get_state(env: &Env) -> PoolState {
    read_instance(env, &DataKey::State)
}

pub fn set_state(env: &Env, state: &PoolState) {
    write_instance(env, &DataKey::State, state);
}

// === Ticks ===

pub fn get_tick(env: &Env, tick: i32) -> TickInfo {
    env.storage()
        .persistent()
        .get(&DataKey::Tick(tick))
        .unwrap_or_default()
}

pub fn set_tick(env: &Env, tick: i32, info: &TickInfo) {
    let entry = DataKey::Tick(tick);
    env.storage().persistent().set(&entry, info);
    touch(env, &entry);
}

pub fn remove_tick(env: &Env, tick: i32) {
    env.storage().persistent().remove(&DataKey::Tick(tick));
}

// === Positions ===

pub fn has_position(env: &Env, key: &PositionKey) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Position(key.clone()))
}

pub fn get_position(env: &Env, key: &PositionKey) -> PositionInfo {
    env.storage()
        .persistent()
        .get(&DataKey::Position(key.clone()))
        .unwrap_or_default()
}

/// Writing an empty position deletes its entry
pub fn set_position(env: &Env, key: &PositionKey, info: &PositionInfo) {
    let entry = DataKey::Position(key.clone());
    if info.is_empty() {
        env.storage().persistent().remove(&entry);
        return;
    }
    env.storage().persistent().set(&entry, info);
    touch(env, &entry);
}
