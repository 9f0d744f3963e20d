//! JSON snapshots of a ledger and its gateway.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::gateway::EncryptedValueGateway;
use crate::ledger::AchievementLedger;
use crate::state::LedgerState;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// On-disk snapshot layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot<G> {
    /// Gateway state (handles, ACLs).
    pub gateway: G,
    /// Ledger state.
    pub state: LedgerState,
}

/// Loads a ledger from `path`; a missing file yields a fresh ledger built
/// from `config` and `fresh_gateway`.
pub fn load<G, F>(path: &Path, config: LedgerConfig, fresh_gateway: F) -> LedgerResult<AchievementLedger<G>>
where
    G: EncryptedValueGateway + DeserializeOwned,
    F: FnOnce() -> G,
{
    if !path.exists() {
        return Ok(AchievementLedger::new(config, fresh_gateway()));
    }
    let bytes = fs::read(path).map_err(|e| LedgerError::Io(e.to_string()))?;
    let snapshot: LedgerSnapshot<G> =
        serde_json::from_slice(&bytes).map_err(|e| LedgerError::Decode(e.to_string()))?;
    Ok(AchievementLedger::from_parts(
        config,
        snapshot.gateway,
        snapshot.state,
    ))
}

/// Persists `ledger` to `path`, creating parent directories.
pub fn save<G>(path: &Path, ledger: AchievementLedger<G>) -> LedgerResult<()>
where
    G: EncryptedValueGateway + Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LedgerError::Io(e.to_string()))?;
    }
    let (gateway, state) = ledger.into_parts();
    let data = serde_json::to_vec_pretty(&LedgerSnapshot { gateway, state })
        .map_err(|e| LedgerError::Decode(e.to_string()))?;
    fs::write(path, data).map_err(|e| LedgerError::Io(e.to_string()))
}
