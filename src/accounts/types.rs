//! Types for the account registry and synchronization passes

use crate::oracle::OracleError;
use crate::provider::{ProviderError, SignerHandle};

use serde::{Deserialize, Serialize};

/// Which synchronization path owns an account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignerType {
    Ethereum,
    Polkadot,
}

/// One chain address plus its metadata, balance, and signer capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Canonical chain address; the unique key within the registry.
    pub address: String,
    /// Chain-neutral form used to match a wallet's live listing. Empty for
    /// Ethereum-style accounts.
    #[serde(default)]
    pub normalized_address: String,
    /// Tags which synchronization path owns this record.
    pub signer_type: SignerType,
    /// Identifier of the originating wallet extension; Polkadot-style only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<String>,
    /// Display label sourced from the wallet, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Balance in whole units; `None` until the first successful fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Opaque signing capability. Never serialized; absent after a restore
    /// until a reinitialization pass re-acquires it.
    #[serde(skip)]
    pub signer: Option<SignerHandle>,
}

impl Account {
    /// Merge the set fields of `patch` into this record, leaving every
    /// unspecified field untouched.
    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(signer_type) = patch.signer_type {
            self.signer_type = signer_type;
        }
        if let Some(normalized_address) = patch.normalized_address {
            self.normalized_address = normalized_address;
        }
        if let Some(wallet_type) = patch.wallet_type {
            self.wallet_type = Some(wallet_type);
        }
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(balance) = patch.balance {
            self.balance = Some(balance);
        }
        if let Some(signer) = patch.signer {
            self.signer = Some(signer);
        }
    }
}

/// Field-level patch applied to an account record by address.
///
/// Only the fields that are `Some` are written; everything else on the
/// existing record survives the merge. Creating a record from a patch
/// requires `signer_type` to be present.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub signer_type: Option<SignerType>,
    pub normalized_address: Option<String>,
    pub wallet_type: Option<String>,
    pub name: Option<String>,
    pub balance: Option<f64>,
    pub signer: Option<SignerHandle>,
}

impl AccountPatch {
    /// A patch carrying only a freshly fetched balance.
    pub fn balance(balance: f64) -> Self {
        Self {
            balance: Some(balance),
            ..Self::default()
        }
    }
}

/// Error types for account synchronization
#[derive(Debug, thiserror::Error)]
pub enum AccountSyncError {
    #[error("no accounts found in {wallet} or access was denied")]
    NoAccountsFound { wallet: String },

    #[error("invalid patch for {address}: {reason}")]
    InvalidPatch { address: String, reason: String },

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}
