//! Chain and account snapshot types plus the collaborator traits that
//! supply them.
//!
//! The resolution core never talks to a wallet's chain or account registry
//! directly. It consumes two injected, read-only collaborators:
//!
//! - [`ChainResolver`] — chain metadata (native currency denom, display name)
//!   and the currently selected chain
//! - [`AccountResolver`] — the wallet address for a given chain, possibly
//!   not yet initialized
//!
//! Both are infallible by contract: an unknown chain id yields a placeholder
//! snapshot, never an error. Degenerate data degrades to an absent purchase
//! link downstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An opaque wallet chain identifier (e.g., `"cosmoshub-4"`).
///
/// Chain ids are compared verbatim; the core attaches no structure to them.
///
/// # Serialization
///
/// Serializes to/from the plain string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Creates a chain id from any string-like value.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the chain id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ChainId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Point-in-time read of a chain's metadata.
///
/// `currency_code` is the chain's native staking denom as configured
/// (case preserved); providers lower- or upper-case it as their endpoints
/// require.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    /// The chain this snapshot was taken for.
    pub chain_id: ChainId,
    /// Native currency denom (e.g., `"ATOM"`).
    pub currency_code: String,
    /// Human-readable chain name (e.g., `"Cosmos Hub"`).
    pub display_name: String,
}

/// Point-in-time read of the wallet's account for one chain.
///
/// `address` is `None` when the account has not been initialized for the
/// chain yet. That is not an error; providers that cannot work without an
/// address simply produce no link (or an empty-string address where the
/// provider's endpoint expects one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// The chain this account belongs to.
    pub chain_id: ChainId,
    /// The wallet address on that chain, if initialized.
    pub address: Option<String>,
}

/// Read-only access to the wallet's per-chain accounts.
///
/// Implementations must never fail: an unknown chain id returns a snapshot
/// with `address: None`.
pub trait AccountResolver {
    /// Returns the account snapshot for the given chain.
    fn account(&self, chain_id: &ChainId) -> AccountSnapshot;
}

/// Read-only access to the wallet's chain registry and active selection.
///
/// Implementations must never fail: an unknown chain id returns a
/// placeholder snapshot.
pub trait ChainResolver {
    /// Returns the metadata snapshot for the given chain.
    fn chain(&self, chain_id: &ChainId) -> ChainSnapshot;

    /// Returns the snapshot of the currently selected chain.
    fn current(&self) -> ChainSnapshot;
}

impl<T: AccountResolver + ?Sized> AccountResolver for Arc<T> {
    fn account(&self, chain_id: &ChainId) -> AccountSnapshot {
        (**self).account(chain_id)
    }
}

impl<T: ChainResolver + ?Sized> ChainResolver for Arc<T> {
    fn chain(&self, chain_id: &ChainId) -> ChainSnapshot {
        (**self).chain(chain_id)
    }

    fn current(&self) -> ChainSnapshot {
        (**self).current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_serialize_plain_string() {
        let chain_id = ChainId::new("cosmoshub-4");
        let serialized = serde_json::to_string(&chain_id).unwrap();
        assert_eq!(serialized, "\"cosmoshub-4\"");
    }

    #[test]
    fn test_chain_id_deserialize_plain_string() {
        let chain_id: ChainId = serde_json::from_str("\"osmosis-1\"").unwrap();
        assert_eq!(chain_id.as_str(), "osmosis-1");
    }

    #[test]
    fn test_chain_id_display_matches_input() {
        let chain_id = ChainId::from("juno-1");
        assert_eq!(chain_id.to_string(), "juno-1");
    }
}
