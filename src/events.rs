//! Notifications emitted by ledger writes.

use crate::identity::{Address, Handle};
use serde::{Deserialize, Serialize};

/// Notification appended to the ledger's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A student uploaded an encrypted score.
    ScoreUploaded {
        /// Uploading student.
        student: Address,
        /// Course the score belongs to.
        course_id: u64,
        /// Handle of the stored score.
        score: Handle,
    },
    /// Part of the event schema; no ledger path emits it.
    CoursePassed {
        /// Student concerned.
        student: Address,
        /// Course concerned.
        course_id: u64,
    },
    /// A study journal entry was written.
    StudyRecorded {
        /// Journaling student.
        student: Address,
        /// Day bucket timestamp of the entry.
        day: u64,
    },
    /// A check-in call completed. Fires on same-day repeats as well.
    CheckInRecorded {
        /// Checking-in student.
        student: Address,
        /// Streak length after the call.
        consecutive_days: u64,
    },
    /// A skill proof token was minted.
    ProofGenerated {
        /// Token owner.
        student: Address,
        /// Global skill proof id (also the token id).
        skill_id: u64,
        /// Course the proof refers to.
        course_id: u64,
    },
}

impl LedgerEvent {
    /// Short event name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::ScoreUploaded { .. } => "SCORE_UPLOADED",
            LedgerEvent::CoursePassed { .. } => "COURSE_PASSED",
            LedgerEvent::StudyRecorded { .. } => "STUDY_RECORDED",
            LedgerEvent::CheckInRecorded { .. } => "CHECK_IN",
            LedgerEvent::ProofGenerated { .. } => "PROOF_GENERATED",
        }
    }

    /// Student the notification concerns.
    pub fn student(&self) -> Address {
        match self {
            LedgerEvent::ScoreUploaded { student, .. }
            | LedgerEvent::CoursePassed { student, .. }
            | LedgerEvent::StudyRecorded { student, .. }
            | LedgerEvent::CheckInRecorded { student, .. }
            | LedgerEvent::ProofGenerated { student, .. } => *student,
        }
    }
}
