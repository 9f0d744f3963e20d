//! Skill proof issuance: a global id counter, per-owner proof records and
//! token URI composition on top of an [`OwnershipRegistry`].

use crate::config::BaseUriPolicy;
use crate::error::{LedgerError, LedgerResult};
use crate::identity::Address;
use crate::tokens::{OwnershipRegistry, TokenRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Metadata stored with a minted proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProof {
    /// Course the proof refers to.
    pub course_id: u64,
    /// Ledger time of issuance.
    pub timestamp: u64,
}

/// Read view of a proof; `exists` is false for unknown (owner, id) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillProofInfo {
    /// Course the proof refers to.
    pub course_id: u64,
    /// Ledger time of issuance.
    pub timestamp: u64,
    /// Whether the proof exists under the queried owner.
    pub exists: bool,
}

/// Issues skill proofs and mints the matching tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofIssuer<R = TokenRegistry> {
    next_skill_id: u64,
    proofs: HashMap<Address, BTreeMap<u64, SkillProof>>,
    base_uri: String,
    registry: R,
}

impl<R: OwnershipRegistry> ProofIssuer<R> {
    /// Creates an issuer backed by `registry`.
    pub fn with_registry(registry: R, base_uri: String) -> Self {
        Self {
            next_skill_id: 0,
            proofs: HashMap::new(),
            base_uri,
            registry,
        }
    }

    /// Mints the next proof to `owner` and returns its id. The counter only
    /// advances once the mint succeeded.
    pub fn issue(&mut self, owner: Address, course_id: u64, timestamp: u64) -> LedgerResult<u64> {
        let skill_id = self.next_skill_id;
        self.registry.mint(owner, skill_id)?;
        self.proofs.entry(owner).or_default().insert(
            skill_id,
            SkillProof {
                course_id,
                timestamp,
            },
        );
        self.next_skill_id += 1;
        Ok(skill_id)
    }

    /// Proof metadata for `(owner, skill_id)`.
    pub fn proof(&self, owner: Address, skill_id: u64) -> SkillProofInfo {
        self.proofs
            .get(&owner)
            .and_then(|owned| owned.get(&skill_id))
            .map(|proof| SkillProofInfo {
                course_id: proof.course_id,
                timestamp: proof.timestamp,
                exists: true,
            })
            .unwrap_or_default()
    }

    /// Ids issued to `owner`, ascending.
    pub fn proofs_of(&self, owner: Address) -> Vec<u64> {
        self.proofs
            .get(&owner)
            .map(|owned| owned.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of proofs issued so far, which is also the next id.
    pub fn total(&self) -> u64 {
        self.next_skill_id
    }

    /// `base + decimal(id)`, or empty when no base is set.
    pub fn token_uri(&self, token_id: u64) -> LedgerResult<String> {
        if !self.registry.exists(token_id) {
            return Err(LedgerError::TokenNotFound(token_id));
        }
        if self.base_uri.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}{}", self.base_uri, token_id))
    }

    /// Replaces the base URI when `policy` admits `caller`.
    pub fn set_base_uri(
        &mut self,
        policy: &BaseUriPolicy,
        caller: Address,
        base_uri: String,
    ) -> LedgerResult<()> {
        if !policy.permits(caller) {
            return Err(LedgerError::Unauthorized(caller));
        }
        self.base_uri = base_uri;
        Ok(())
    }

    /// Current base URI.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Underlying ownership registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }
}
