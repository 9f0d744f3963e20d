//! Serializable ledger state: the course catalog, lazily created student
//! records, the proof issuer and the notification log.

use crate::checkin::CheckInStreak;
use crate::courses::CourseRegistry;
use crate::events::LedgerEvent;
use crate::identity::Address;
use crate::journal::StudyJournal;
use crate::proofs::ProofIssuer;
use crate::scores::ScoreSheet;
use crate::tokens::TokenRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the ledger keeps for one identity. Created on first write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Latest score per course.
    pub scores: ScoreSheet,
    /// Study journal by day bucket.
    pub journal: StudyJournal,
    /// Check-in streak.
    pub check_in: CheckInStreak,
}

/// Complete persisted ledger state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub(crate) courses: CourseRegistry,
    pub(crate) students: HashMap<Address, StudentRecord>,
    pub(crate) proofs: ProofIssuer<TokenRegistry>,
    pub(crate) events: Vec<LedgerEvent>,
}

impl LedgerState {
    /// Empty state whose issuer starts with `base_uri`.
    pub fn new(base_uri: String) -> Self {
        Self {
            proofs: ProofIssuer::with_registry(TokenRegistry::default(), base_uri),
            ..Self::default()
        }
    }

    /// Record for `student`, if one was ever written.
    pub fn student(&self, student: Address) -> Option<&StudentRecord> {
        self.students.get(&student)
    }

    /// Record for `student`, materialized on demand.
    pub(crate) fn student_mut(&mut self, student: Address) -> &mut StudentRecord {
        self.students.entry(student).or_default()
    }
}
