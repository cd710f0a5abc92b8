//! Wallet provider adapters
//!
//! Providers are the external sources of addresses and signer capabilities.
//! The Ethereum-style provider exposes at most one currently connected
//! address, with the connection lifecycle driven outside this crate. A
//! Polkadot-style provider enumerates the live accounts of a named wallet,
//! keyed by normalized address, each carrying a signer handle.

/// Externally-driven Ethereum-style connection state
mod ethereum;
/// File-keystore implementation of the Polkadot-style provider
mod keystore;

pub use ethereum::WatchedEthereumProvider;
pub use keystore::{FileKeystoreProvider, KeystoreEntry, KeystoreFile};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque signing capability for one address.
pub trait Signer: Send + Sync {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, ProviderError>;
}

/// Cloneable handle to a signer capability. Never persisted; re-acquired from
/// the originating provider on every reinitialization pass.
#[derive(Clone)]
pub struct SignerHandle(Arc<dyn Signer>);

impl SignerHandle {
    pub fn new(signer: impl Signer + 'static) -> Self {
        Self(Arc::new(signer))
    }

    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, ProviderError> {
        self.0.sign(payload)
    }
}

impl fmt::Debug for SignerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignerHandle")
    }
}

/// One account as reported by a Polkadot-style wallet.
#[derive(Debug, Clone)]
pub struct ProviderAccount {
    /// The account's SS58 address as the wallet displays it.
    pub address: String,
    /// Display label from the wallet, when it has one.
    pub name: Option<String>,
    /// Signing capability for this address.
    pub signer: SignerHandle,
}

/// Ethereum-style wallet source: a single externally-managed connection.
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync {
    /// The currently connected address, if any. Connection and disconnection
    /// are driven externally; the core only observes presence or absence.
    async fn active_address(&self) -> Result<Option<String>, ProviderError>;
}

/// Polkadot-style wallet source: a named extension with many accounts.
#[async_trait::async_trait]
pub trait PolkadotProvider: Send + Sync {
    /// Enumerate the live accounts of the named wallet, keyed by normalized
    /// (chain-neutral) address.
    async fn list_accounts(
        &self,
        wallet_type: &str,
    ) -> Result<HashMap<String, ProviderAccount>, ProviderError>;
}

/// Error types for wallet provider operations
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("wallet {0} is not available")]
    WalletUnavailable(String),

    #[error("keystore error: {0}")]
    Keystore(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
