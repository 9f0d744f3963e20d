//! Ownership registry capability for minted skill proof tokens.
//!
//! Only minting and owner lookup live here; transfer and approval belong to
//! whatever registry the host plugs in behind [`OwnershipRegistry`].

use crate::error::{LedgerError, LedgerResult};
use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Abstract token ownership backend.
pub trait OwnershipRegistry {
    /// Mints `token_id` to `owner`; fails if the id is already taken.
    fn mint(&mut self, owner: Address, token_id: u64) -> LedgerResult<()>;

    /// Current owner of `token_id`.
    fn owner_of(&self, token_id: u64) -> Option<Address>;

    /// Number of tokens held by `owner`.
    fn balance_of(&self, owner: Address) -> u64;

    /// True when `token_id` has been minted.
    fn exists(&self, token_id: u64) -> bool {
        self.owner_of(token_id).is_some()
    }
}

/// Mint-only in-memory registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRegistry {
    owners: BTreeMap<u64, Address>,
    balances: HashMap<Address, u64>,
}

impl OwnershipRegistry for TokenRegistry {
    fn mint(&mut self, owner: Address, token_id: u64) -> LedgerResult<()> {
        if self.owners.contains_key(&token_id) {
            return Err(LedgerError::TokenAlreadyMinted(token_id));
        }
        self.owners.insert(token_id, owner);
        let balance = self.balances.entry(owner).or_default();
        *balance = balance.saturating_add(1);
        Ok(())
    }

    fn owner_of(&self, token_id: u64) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    fn balance_of(&self, owner: Address) -> u64 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }
}
