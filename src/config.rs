//! Ledger configuration, read from `SCHOLAR_*` environment variables.

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable holding the ledger's own address (hex).
pub const ENV_CONTRACT_ADDRESS: &str = "SCHOLAR_CONTRACT_ADDRESS";
/// Environment variable holding the initial token base URI.
pub const ENV_BASE_URI: &str = "SCHOLAR_BASE_URI";
/// Environment variable naming the only identity allowed to set the base URI.
pub const ENV_BASE_URI_ADMIN: &str = "SCHOLAR_BASE_URI_ADMIN";
/// Environment variable pointing at the JSON state snapshot.
pub const ENV_STATE_PATH: &str = "SCHOLAR_STATE_PATH";

/// Label the default contract address is derived from.
pub const DEFAULT_CONTRACT_LABEL: &str = "scholar-ledger";

/// Who may change the token base URI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "admin", rename_all = "snake_case")]
pub enum BaseUriPolicy {
    /// Any caller may set it.
    #[default]
    Open,
    /// Only this identity may set it.
    Admin(Address),
}

impl BaseUriPolicy {
    /// Returns true if `caller` may set the base URI.
    pub fn permits(&self, caller: Address) -> bool {
        match self {
            BaseUriPolicy::Open => true,
            BaseUriPolicy::Admin(admin) => *admin == caller,
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set to an unparseable value.
    #[error("invalid value for {var}: {reason}")]
    InvalidValue {
        /// Offending variable.
        var: &'static str,
        /// Parse failure.
        reason: String,
    },
}

/// Runtime configuration of an achievement ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Address of the ledger itself; inputs are bound to it and it is
    /// granted decrypt access on every stored handle.
    pub contract_address: Address,
    /// Initial token base URI.
    pub base_uri: String,
    /// Access policy for base URI changes.
    pub base_uri_policy: BaseUriPolicy,
    /// Where the CLI keeps its snapshot, if anywhere.
    pub state_path: Option<PathBuf>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract_address: Address::from_label(DEFAULT_CONTRACT_LABEL),
            base_uri: String::new(),
            base_uri_policy: BaseUriPolicy::Open,
            state_path: None,
        }
    }
}

impl LedgerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(raw) = get(ENV_CONTRACT_ADDRESS) {
            config.contract_address = parse_address(ENV_CONTRACT_ADDRESS, &raw)?;
        }
        if let Some(raw) = get(ENV_BASE_URI) {
            config.base_uri = raw;
        }
        if let Some(raw) = get(ENV_BASE_URI_ADMIN) {
            config.base_uri_policy =
                BaseUriPolicy::Admin(parse_address(ENV_BASE_URI_ADMIN, &raw)?);
        }
        config.state_path = get(ENV_STATE_PATH).map(PathBuf::from);
        Ok(config)
    }
}

fn parse_address(var: &'static str, raw: &str) -> Result<Address, ConfigError> {
    raw.trim().parse().map_err(|err: crate::identity::IdentityParseError| {
        ConfigError::InvalidValue {
            var,
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.base_uri_policy, BaseUriPolicy::Open);
    }

    #[test]
    fn admin_variable_restricts_policy() {
        let admin = Address::from_label("registrar");
        let admin_hex = admin.to_string();
        let config = LedgerConfig::from_lookup(lookup(&[
            (ENV_BASE_URI_ADMIN, admin_hex.as_str()),
            (ENV_BASE_URI, "ipfs://proofs/"),
            (ENV_STATE_PATH, "/tmp/scholar.json"),
        ]))
        .unwrap();
        assert_eq!(config.base_uri_policy, BaseUriPolicy::Admin(admin));
        assert_eq!(config.base_uri, "ipfs://proofs/");
        assert_eq!(config.state_path, Some(PathBuf::from("/tmp/scholar.json")));
    }

    #[test]
    fn malformed_address_is_reported() {
        let err = LedgerConfig::from_lookup(lookup(&[(ENV_CONTRACT_ADDRESS, "0xnothex")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: ENV_CONTRACT_ADDRESS,
                ..
            }
        ));
    }
}
