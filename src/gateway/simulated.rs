//! In-process stand-in for the homomorphic compute service.
//!
//! Plaintexts live in a private table keyed by handle. Handles are SHA-256
//! derivations over a domain tag, the gateway secret and a nonce; input
//! proofs are BLAKE2b-256 digests binding the ciphertext to the contract and
//! caller under the same secret. Good enough to exercise every ledger path
//! deterministically; it offers no confidentiality.

use super::{EncryptedValueGateway, ExternalInput, GatewayError};
use crate::identity::{Address, Handle};
use blake2::digest::{consts::U32, Digest};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::{BTreeSet, HashMap};

type Blake2b256 = blake2::Blake2b<U32>;

const EXTERNAL_TAG: &[u8] = b"scholar-external-ct-v1";
const INTERNAL_TAG: &[u8] = b"scholar-handle-v1";
const PROOF_TAG: &[u8] = b"scholar-input-proof-v1";

/// Deterministic simulation of the encrypted value gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedGateway {
    secret: [u8; 32],
    nonce: u64,
    external: HashMap<Handle, u64>,
    values: HashMap<Handle, u64>,
    acl: HashMap<Handle, BTreeSet<Address>>,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedGateway {
    /// Creates a gateway with a random secret.
    pub fn new() -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::with_secret(secret)
    }

    /// Creates a gateway whose secret is derived from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut secret = [0u8; 32];
        StdRng::seed_from_u64(seed).fill_bytes(&mut secret);
        Self::with_secret(secret)
    }

    fn with_secret(secret: [u8; 32]) -> Self {
        Self {
            secret,
            nonce: 0,
            external: HashMap::new(),
            values: HashMap::new(),
            acl: HashMap::new(),
        }
    }

    /// Client side: encrypts `value` for submission by `caller` to `contract`.
    pub fn encrypt_input(&mut self, value: u64, contract: Address, caller: Address) -> ExternalInput {
        let ciphertext = self.next_handle(EXTERNAL_TAG);
        self.external.insert(ciphertext, value);
        let proof = self.proof_for(&ciphertext, &contract, &caller).to_vec();
        ExternalInput::new(ciphertext, proof)
    }

    /// Decrypts `handle` on behalf of `identity`, honoring the ACL.
    pub fn reveal(&self, handle: Handle, identity: Address) -> Result<u64, GatewayError> {
        if !self.is_allowed(handle, identity) {
            return Err(GatewayError::Unauthorized(identity));
        }
        self.plaintext(handle)
    }

    /// Identities allowed to decrypt `handle`, ascending.
    pub fn grantees(&self, handle: Handle) -> Vec<Address> {
        self.acl
            .get(&handle)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn plaintext(&self, handle: Handle) -> Result<u64, GatewayError> {
        self.values
            .get(&handle)
            .copied()
            .ok_or(GatewayError::UnknownHandle(handle))
    }

    fn next_handle(&mut self, tag: &[u8]) -> Handle {
        let mut hasher = Sha256::new();
        hasher.update(tag);
        hasher.update(self.secret);
        hasher.update(self.nonce.to_be_bytes());
        self.nonce += 1;
        Handle::new(hasher.finalize().into())
    }

    fn store(&mut self, value: u64) -> Handle {
        let handle = self.next_handle(INTERNAL_TAG);
        self.values.insert(handle, value);
        handle
    }

    fn proof_for(&self, ciphertext: &Handle, contract: &Address, caller: &Address) -> [u8; 32] {
        let mut hasher = Blake2b256::new();
        hasher.update(PROOF_TAG);
        hasher.update(self.secret);
        hasher.update(ciphertext.as_bytes());
        hasher.update(contract.as_bytes());
        hasher.update(caller.as_bytes());
        hasher.finalize().into()
    }
}

impl EncryptedValueGateway for SimulatedGateway {
    fn from_external(
        &mut self,
        input: &ExternalInput,
        contract: Address,
        caller: Address,
    ) -> Result<Handle, GatewayError> {
        let expected = self.proof_for(&input.ciphertext, &contract, &caller);
        if input.proof.as_slice() != expected.as_slice() {
            return Err(GatewayError::InvalidProof);
        }
        let value = *self
            .external
            .get(&input.ciphertext)
            .ok_or(GatewayError::UnknownHandle(input.ciphertext))?;
        Ok(self.store(value))
    }

    fn encrypt_constant(&mut self, value: u64) -> Handle {
        self.store(value)
    }

    fn ge(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle, GatewayError> {
        let result = self.plaintext(lhs)? >= self.plaintext(rhs)?;
        Ok(self.store(u64::from(result)))
    }

    fn select(
        &mut self,
        condition: Handle,
        if_true: Handle,
        if_false: Handle,
    ) -> Result<Handle, GatewayError> {
        let chosen = if self.plaintext(condition)? != 0 {
            self.plaintext(if_true)?
        } else {
            self.plaintext(if_false)?
        };
        Ok(self.store(chosen))
    }

    fn allow(&mut self, handle: Handle, identity: Address) {
        self.acl.entry(handle).or_default().insert(identity);
    }

    fn is_allowed(&self, handle: Handle, identity: Address) -> bool {
        self.acl
            .get(&handle)
            .map_or(false, |set| set.contains(&identity))
    }
}
