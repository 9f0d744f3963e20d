//! Fixed-size identifiers shared across the ledger: caller addresses and
//! encrypted value handles.
//!
//! Both types render as `0x`-prefixed lowercase hex and serialize as strings
//! so they can key JSON maps in persisted snapshots.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of an [`Address`] in bytes.
pub const ADDRESS_LENGTH: usize = 20;
/// Length of a [`Handle`] in bytes.
pub const HANDLE_LENGTH: usize = 32;

/// Errors raised while parsing hex identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityParseError {
    /// Input was not valid hex.
    #[error("invalid hex: {0}")]
    Hex(String),
    /// Decoded byte length did not match the identifier width.
    #[error("expected {expected} bytes, found {found}")]
    Length {
        /// Required byte length.
        expected: usize,
        /// Decoded byte length.
        found: usize,
    },
}

fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], IdentityParseError> {
    let trimmed = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(trimmed).map_err(|err| IdentityParseError::Hex(err.to_string()))?;
    let found = bytes.len();
    bytes
        .try_into()
        .map_err(|_| IdentityParseError::Length { expected: N, found })
}

/// Ledger identity of a caller or of the ledger contract itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Wraps raw address bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derives a stable address from a human label (last 20 bytes of
    /// keccak-256), used by the CLI and tests to name callers.
    pub fn from_label(label: &str) -> Self {
        let digest = Keccak256::digest(label.as_bytes());
        let mut out = [0u8; ADDRESS_LENGTH];
        out.copy_from_slice(&digest[digest.len() - ADDRESS_LENGTH..]);
        Self(out)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

/// Opaque reference to a value that only exists as ciphertext on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle([u8; HANDLE_LENGTH]);

impl Handle {
    /// The zero handle returned by reads for absent values.
    pub const ZERO: Handle = Handle([0u8; HANDLE_LENGTH]);

    /// Wraps raw handle bytes.
    pub const fn new(bytes: [u8; HANDLE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw handle bytes.
    pub fn as_bytes(&self) -> &[u8; HANDLE_LENGTH] {
        &self.0
    }

    /// True for [`Handle::ZERO`].
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HANDLE_LENGTH]
    }
}

macro_rules! hex_identifier {
    ($ty:ident, $len:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($ty))
            }
        }

        impl FromStr for $ty {
            type Err = IdentityParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_fixed::<{ $len }>(s).map(Self)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    };
}

hex_identifier!(Address, ADDRESS_LENGTH);
hex_identifier!(Handle, HANDLE_LENGTH);
