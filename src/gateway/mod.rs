//! Encrypted value capability consumed by the ledger.
//!
//! The ledger never sees plaintext. It hands external ciphertexts to an
//! [`EncryptedValueGateway`] for proof verification, asks it to compare and
//! select on handles, and records which identities may later decrypt a
//! handle. Decryption itself happens off-ledger.

use crate::identity::{Address, Handle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod simulated;

pub use simulated::SimulatedGateway;

/// Failures reported by the encrypted value capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The proof does not bind the ciphertext to this contract and caller.
    #[error("input proof failed verification")]
    InvalidProof,
    /// The handle is not known to the gateway.
    #[error("unknown handle {0}")]
    UnknownHandle(Handle),
    /// The identity holds no decrypt authorization for the handle.
    #[error("{0} may not decrypt this handle")]
    Unauthorized(Address),
}

/// Ciphertext submitted by a client together with its validity proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalInput {
    /// External ciphertext identifier.
    pub ciphertext: Handle,
    /// Proof bytes, base64 encoded on the wire.
    #[serde(with = "proof_base64")]
    pub proof: Vec<u8>,
}

impl ExternalInput {
    /// Bundles a ciphertext identifier with its proof.
    pub fn new(ciphertext: Handle, proof: Vec<u8>) -> Self {
        Self { ciphertext, proof }
    }
}

mod proof_base64 {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BASE64.decode(raw).map_err(de::Error::custom)
    }
}

/// Homomorphic compute and access-control service backing every encrypted
/// field on the ledger.
///
/// `allow` is infallible so that authorization grants can run after all
/// fallible steps of a call have succeeded.
pub trait EncryptedValueGateway {
    /// Verifies `input` against `contract` and `caller` and converts it into
    /// an internal handle.
    fn from_external(
        &mut self,
        input: &ExternalInput,
        contract: Address,
        caller: Address,
    ) -> Result<Handle, GatewayError>;

    /// Encrypts a public constant.
    fn encrypt_constant(&mut self, value: u64) -> Handle;

    /// Encrypted `lhs >= rhs`, as an encrypted boolean.
    fn ge(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle, GatewayError>;

    /// Encrypted `condition ? if_true : if_false`.
    fn select(
        &mut self,
        condition: Handle,
        if_true: Handle,
        if_false: Handle,
    ) -> Result<Handle, GatewayError>;

    /// Grants `identity` permission to decrypt `handle`.
    fn allow(&mut self, handle: Handle, identity: Address);

    /// Returns true when `identity` may decrypt `handle`.
    fn is_allowed(&self, handle: Handle, identity: Address) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_input_proof_is_base64_in_json() {
        let input = ExternalInput::new(Handle::ZERO, vec![1, 2, 3]);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["proof"], "AQID");
        let back: ExternalInput = serde_json::from_value(json).unwrap();
        assert_eq!(back, input);
    }
}
