//! Per-student encrypted course scores and their derived pass flags.

use crate::gateway::{EncryptedValueGateway, GatewayError};
use crate::identity::Handle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latest score for one course. Presence in a [`ScoreSheet`] is the
/// has-score flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Encrypted score.
    pub score: Handle,
    /// Encrypted 1/0 pass flag.
    pub passed: Handle,
}

/// Read view returned by score lookups; zero handles when nothing was uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreView {
    /// Encrypted score.
    pub score: Handle,
    /// Encrypted 1/0 pass flag.
    pub passed: Handle,
}

/// One student's scores keyed by course id. Only the latest upload is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreSheet {
    entries: BTreeMap<u64, ScoreEntry>,
}

impl ScoreSheet {
    /// Overwrites the entry for `course_id`.
    pub fn record(&mut self, course_id: u64, entry: ScoreEntry) {
        self.entries.insert(course_id, entry);
    }

    /// True once any score was uploaded for `course_id`.
    pub fn has_score(&self, course_id: u64) -> bool {
        self.entries.contains_key(&course_id)
    }

    /// Score handles for `course_id`, zero when absent.
    pub fn view(&self, course_id: u64) -> ScoreView {
        self.entries
            .get(&course_id)
            .map(|entry| ScoreView {
                score: entry.score,
                passed: entry.passed,
            })
            .unwrap_or_default()
    }

    /// Course ids with an uploaded score, ascending.
    pub fn courses(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }
}

/// Computes `select(score >= threshold, 1, 0)` without leaving ciphertext.
pub fn passed_flag<G: EncryptedValueGateway + ?Sized>(
    gateway: &mut G,
    score: Handle,
    threshold: Handle,
) -> Result<Handle, GatewayError> {
    let reached = gateway.ge(score, threshold)?;
    let one = gateway.encrypt_constant(1);
    let zero = gateway.encrypt_constant(0);
    gateway.select(reached, one, zero)
}
