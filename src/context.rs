//! Per-call facts supplied by the ledger substrate.

use crate::identity::Address;

/// Identity and time of the transaction being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Address of the caller; writes only touch this identity's record.
    pub caller: Address,
    /// Ledger time in unix seconds, monotonic across calls.
    pub timestamp: u64,
}

impl CallContext {
    /// Builds a call context.
    pub fn new(caller: Address, timestamp: u64) -> Self {
        Self { caller, timestamp }
    }
}
