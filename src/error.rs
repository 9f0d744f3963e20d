//! Error types surfaced by ledger operations.

use crate::gateway::GatewayError;
use crate::identity::Address;
use thiserror::Error;

/// Reasons a ledger write is rejected. Reads never fail except where noted on
/// the accessor.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced course was never created.
    #[error("course {0} does not exist")]
    CourseNotFound(u64),
    /// An external ciphertext failed proof verification.
    #[error("encrypted input rejected: {0}")]
    ProofVerification(GatewayError),
    /// A skill proof was requested before any score was uploaded.
    #[error("no score uploaded for course {course_id}")]
    ScoreRequired {
        /// Course the caller has no score for.
        course_id: u64,
    },
    /// Token URI requested for an id that was never minted.
    #[error("token {0} does not exist")]
    TokenNotFound(u64),
    /// The ownership registry already holds this token id.
    #[error("token {0} already minted")]
    TokenAlreadyMinted(u64),
    /// The caller is not permitted to perform the operation.
    #[error("caller {0} is not authorized")]
    Unauthorized(Address),
    /// Any other failure reported by the encrypted value gateway.
    #[error("gateway error: {0}")]
    Gateway(GatewayError),
    /// Filesystem failure while loading or saving state.
    #[error("io error: {0}")]
    Io(String),
    /// Snapshot could not be encoded or decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl LedgerError {
    /// Rejection reason surfaced to the caller.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<GatewayError> for LedgerError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidProof => LedgerError::ProofVerification(err),
            other => LedgerError::Gateway(other),
        }
    }
}

/// Convenience alias for ledger results.
pub type LedgerResult<T> = Result<T, LedgerError>;
