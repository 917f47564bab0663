//! Per-owner token lists.
//!
//! Each owner's tokens live in indexed slots `OwnerTokenAt(owner, i)` for
//! `i < OwnerTokenCount(owner)`, with `TokenIndex(id)` pointing back at the
//! slot. Appends go to the end; removals move the last slot into the hole.

use crate::storage::{extend_persistent_ttl, DataKey};
use soroban_sdk::{Address, Env, Vec};

pub fn balance_of(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerTokenCount(owner.clone()))
        .unwrap_or(0)
}

fn set_balance(env: &Env, owner: &Address, count: u32) {
    let key = DataKey::OwnerTokenCount(owner.clone());
    if count == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &count);
        extend_persistent_ttl(env, &key);
    }
}

pub fn token_at(env: &Env, owner: &Address, index: u32) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerTokenAt(owner.clone(), index))
}

fn set_token_at(env: &Env, owner: &Address, index: u32, token_id: u32) {
    let slot = DataKey::OwnerTokenAt(owner.clone(), index);
    env.storage().persistent().set(&slot, &token_id);
    extend_persistent_ttl(env, &slot);

    let back = DataKey::TokenIndex(token_id);
    env.storage().persistent().set(&back, &index);
    extend_persistent_ttl(env, &back);
}

/// Append `token_id` to the end of `owner`'s list
pub fn add_token_to_owner(env: &Env, owner: &Address, token_id: u32) {
    let count = balance_of(env, owner);
    set_token_at(env, owner, count, token_id);
    set_balance(env, owner, count + 1);
}

/// Swap-remove `token_id` from `owner`'s list
pub fn remove_token_from_owner(env: &Env, owner: &Address, token_id: u32) {
    let count = balance_of(env, owner);
    let index: Option<u32> = env
        .storage()
        .persistent()
        .get(&DataKey::TokenIndex(token_id));
    let Some(index) = index else {
        return;
    };
    if count == 0 {
        return;
    }

    let last = count - 1;
    if index != last {
        if let Some(moved) = token_at(env, owner, last) {
            set_token_at(env, owner, index, moved);
        }
    }

    env.storage()
        .persistent()
        .remove(&DataKey::OwnerTokenAt(owner.clone(), last));
    env.storage()
        .persistent()
        .remove(&DataKey::TokenIndex(token_id));
    set_balance(env, owner, last);
}

/// Every token `owner` holds, in list order
pub fn tokens_of_owner(env: &Env, owner: &Address) -> Vec<u32> {
    let mut tokens = Vec::new(env);
    for index in 0..balance_of(env, owner) {
        if let Some(token_id) = token_at(env, owner, index) {
            tokens.push_back(token_id);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClmmPositionNft;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::vec;

    fn with_contract<F: FnOnce(&Env)>(f: F) {
        let env = Env::default();
        let factory = Address::generate(&env);
        let contract = env.register(ClmmPositionNft, (factory,));
        env.as_contract(&contract, || f(&env));
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        with_contract(|env| {
            let owner = Address::generate(env);
            add_token_to_owner(env, &owner, 4);
            add_token_to_owner(env, &owner, 9);
            add_token_to_owner(env, &owner, 2);

            assert_eq!(balance_of(env, &owner), 3);
            assert_eq!(tokens_of_owner(env, &owner), vec![env, 4, 9, 2]);
            assert_eq!(token_at(env, &owner, 1), Some(9));
            assert_eq!(token_at(env, &owner, 3), None);
        });
    }

    #[test]
    fn test_remove_first_moves_last_into_hole() {
        with_contract(|env| {
            let owner = Address::generate(env);
            for id in 0..3 {
                add_token_to_owner(env, &owner, id);
            }

            remove_token_from_owner(env, &owner, 0);
            assert_eq!(tokens_of_owner(env, &owner), vec![env, 2, 1]);

            // the moved token's back-pointer must follow it
            remove_token_from_owner(env, &owner, 2);
            assert_eq!(tokens_of_owner(env, &owner), vec![env, 1]);
        });
    }

    #[test]
    fn test_remove_last_and_only() {
        with_contract(|env| {
            let owner = Address::generate(env);
            add_token_to_owner(env, &owner, 7);
            add_token_to_owner(env, &owner, 8);

            remove_token_from_owner(env, &owner, 8);
            assert_eq!(tokens_of_owner(env, &owner), vec![env, 7]);

            remove_token_from_owner(env, &owner, 7);
            assert_eq!(balance_of(env, &owner), 0);
            assert!(tokens_of_owner(env, &owner).is_empty());
        });
    }

    #[test]
    fn test_owners_are_independent() {
        with_contract(|env| {
            let alice = Address::generate(env);
            let bob = Address::generate(env);
            add_token_to_owner(env, &alice, 0);
            add_token_to_owner(env, &bob, 1);
            add_token_to_owner(env, &alice, 2);

            remove_token_from_owner(env, &alice, 0);
            assert_eq!(tokens_of_owner(env, &alice), vec![env, 2]);
            assert_eq!(tokens_of_owner(env, &bob), vec![env, 1]);
        });
    }
}
