//! Canonical registry of account records.
//!
//! The registry owns the ordered collection of accounts (insertion order
//! defines selection indices), the selected-account index, and persistence.
//! Every mutation that changes the collection serializes the full
//! non-ephemeral snapshot to the injected [`SnapshotStore`] immediately;
//! persistence failures are logged and never roll back the in-memory
//! mutation. In-memory state is the source of truth, the store is a cache
//! for reload.

use crate::accounts::persistence::SnapshotStore;
use crate::accounts::types::{Account, AccountPatch, AccountSyncError, SignerType};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const ACCOUNTS_SLOT: &str = "accounts";
const SELECTED_SLOT: &str = "selected_account";

/// Persisted form of the registry: every account minus signer capabilities.
#[derive(Serialize, Deserialize)]
struct PersistedSnapshot {
    saved_at: String,
    accounts: Vec<Account>,
}

/// Ordered, address-keyed collection of accounts with an index-based
/// selection model.
pub struct AccountRegistry {
    /// Insertion-ordered records; addresses are unique.
    accounts: Vec<Account>,
    /// Selection index into the current order. Not validated at write time;
    /// an out-of-range index dereferences to no selection.
    selected_index: usize,
    store: Box<dyn SnapshotStore>,
}

impl AccountRegistry {
    pub fn new(store: Box<dyn SnapshotStore>) -> Self {
        Self {
            accounts: Vec::new(),
            selected_index: 0,
            store,
        }
    }

    /// Restore accounts and selection from the store.
    ///
    /// A corrupt or unparsable snapshot is treated as no saved state: it is
    /// logged and the registry stays empty. Nothing here is raised to the
    /// caller.
    pub async fn restore(&mut self) {
        match self.store.load(ACCOUNTS_SLOT).await {
            Ok(Some(raw)) => match serde_json::from_str::<PersistedSnapshot>(&raw) {
                Ok(snapshot) => {
                    info!(
                        "Restored {} account(s) from snapshot saved at {}",
                        snapshot.accounts.len(),
                        snapshot.saved_at
                    );
                    self.accounts = snapshot.accounts;
                }
                Err(e) => warn!("Discarding corrupt account snapshot: {}", e),
            },
            Ok(None) => debug!("No saved account snapshot"),
            Err(e) => warn!("Failed to load account snapshot: {}", e),
        }

        match self.store.load(SELECTED_SLOT).await {
            Ok(Some(raw)) => match raw.trim().parse::<usize>() {
                Ok(index) => self.selected_index = index,
                Err(e) => warn!("Discarding corrupt selection slot: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!("Failed to load selection slot: {}", e),
        }
    }

    /// Current snapshot in insertion order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, address: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.address == address)
    }

    /// Merge `patch` into the record at `address`, creating the record when
    /// absent. Unspecified fields are preserved. Creation requires the patch
    /// to carry a signer type; at most one Ethereum-style record exists at a
    /// time, so creating one replaces any previous Ethereum-style record.
    pub async fn upsert(
        &mut self,
        address: &str,
        patch: AccountPatch,
    ) -> Result<(), AccountSyncError> {
        if let Some(account) = self.accounts.iter_mut().find(|a| a.address == address) {
            account.apply(patch);
        } else {
            let signer_type = patch.signer_type.ok_or_else(|| AccountSyncError::InvalidPatch {
                address: address.to_string(),
                reason: "creating a record requires a signer type".to_string(),
            })?;
            if signer_type == SignerType::Ethereum
                && self.accounts.iter().any(|a| a.signer_type == SignerType::Ethereum)
            {
                debug!("Replacing previous Ethereum-style record");
                self.accounts.retain(|a| a.signer_type != SignerType::Ethereum);
            }
            self.accounts.push(Account {
                address: address.to_string(),
                normalized_address: patch.normalized_address.unwrap_or_default(),
                signer_type,
                wallet_type: patch.wallet_type,
                name: patch.name,
                balance: patch.balance,
                signer: patch.signer,
            });
        }

        self.persist_accounts().await;
        Ok(())
    }

    /// Remove every record matching `predicate`; returns how many went.
    pub async fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Account) -> bool,
    {
        let before = self.accounts.len();
        self.accounts.retain(|a| !predicate(a));
        let removed = before - self.accounts.len();
        if removed > 0 {
            self.persist_accounts().await;
        }
        removed
    }

    /// Set the selection index. No bounds validation happens here; validity
    /// is resolved by [`AccountRegistry::selected_account`] on each read.
    pub async fn select(&mut self, index: usize) {
        self.selected_index = index;
        if let Err(e) = self.store.save(SELECTED_SLOT, &index.to_string()).await {
            warn!("Failed to persist selection: {}", e);
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The record the stored index currently points at, if it resolves
    /// against the present order.
    pub fn selected_account(&self) -> Option<&Account> {
        self.accounts.get(self.selected_index)
    }

    /// Empty the registry, reset the selection, and purge persisted state.
    pub async fn clear(&mut self) {
        self.accounts.clear();
        self.selected_index = 0;
        if let Err(e) = self.store.remove(ACCOUNTS_SLOT).await {
            warn!("Failed to purge account snapshot: {}", e);
        }
        if let Err(e) = self.store.remove(SELECTED_SLOT).await {
            warn!("Failed to purge selection slot: {}", e);
        }
        info!("Cleared account registry and purged saved state");
    }

    async fn persist_accounts(&self) {
        let snapshot = PersistedSnapshot {
            saved_at: chrono::Utc::now().to_rfc3339(),
            accounts: self.accounts.clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(serialized) => {
                if let Err(e) = self.store.save(ACCOUNTS_SLOT, &serialized).await {
                    warn!("Failed to persist account snapshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize account snapshot: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::persistence::MemorySnapshotStore;
    use crate::provider::{ProviderError, Signer, SignerHandle};

    struct NoopSigner;

    impl Signer for NoopSigner {
        fn sign(&self, _payload: &[u8]) -> Result<Vec<u8>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn polkadot_patch(name: &str) -> AccountPatch {
        AccountPatch {
            signer_type: Some(SignerType::Polkadot),
            normalized_address: Some(format!("0x{name}")),
            wallet_type: Some("test-wallet".to_string()),
            name: Some(name.to_string()),
            balance: None,
            signer: Some(SignerHandle::new(NoopSigner)),
        }
    }

    fn registry() -> AccountRegistry {
        AccountRegistry::new(Box::new(MemorySnapshotStore::new()))
    }

    #[tokio::test]
    async fn upsert_preserves_unspecified_fields() {
        let mut registry = registry();
        registry.upsert("addr-1", polkadot_patch("alice")).await.unwrap();
        registry.upsert("addr-1", AccountPatch::balance(2.25)).await.unwrap();

        let account = registry.get("addr-1").unwrap();
        assert_eq!(account.balance, Some(2.25));
        assert_eq!(account.name.as_deref(), Some("alice"));
        assert_eq!(account.wallet_type.as_deref(), Some("test-wallet"));
        assert_eq!(account.normalized_address, "0xalice");
        assert!(account.signer.is_some());
    }

    #[tokio::test]
    async fn addresses_stay_unique_across_upserts() {
        let mut registry = registry();
        for _ in 0..3 {
            registry.upsert("addr-1", polkadot_patch("alice")).await.unwrap();
        }
        registry.upsert("addr-2", polkadot_patch("bob")).await.unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn creation_without_signer_type_is_rejected() {
        let mut registry = registry();
        let result = registry.upsert("addr-1", AccountPatch::balance(1.0)).await;
        assert!(matches!(
            result,
            Err(AccountSyncError::InvalidPatch { .. })
        ));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn at_most_one_ethereum_record_exists() {
        let mut registry = registry();
        let ethereum = AccountPatch {
            signer_type: Some(SignerType::Ethereum),
            ..AccountPatch::default()
        };
        registry.upsert("0xaaa", ethereum.clone()).await.unwrap();
        registry.upsert("0xbbb", ethereum).await.unwrap();

        let ethereum_records: Vec<_> = registry
            .accounts()
            .iter()
            .filter(|a| a.signer_type == SignerType::Ethereum)
            .collect();
        assert_eq!(ethereum_records.len(), 1);
        assert_eq!(ethereum_records[0].address, "0xbbb");
    }

    #[tokio::test]
    async fn selection_resolves_lazily_against_current_order() {
        let mut registry = registry();
        registry.upsert("addr-1", polkadot_patch("a")).await.unwrap();
        registry.upsert("addr-2", polkadot_patch("b")).await.unwrap();

        registry.select(5).await;
        assert!(registry.selected_account().is_none());

        for name in ["c", "d", "e", "f"] {
            registry
                .upsert(&format!("addr-{name}"), polkadot_patch(name))
                .await
                .unwrap();
        }
        // The same stored index now dereferences to a concrete record.
        assert_eq!(registry.selected_account().unwrap().address, "addr-f");
    }

    #[tokio::test]
    async fn snapshot_restores_without_signers() {
        let store = MemorySnapshotStore::new();
        let mut registry = AccountRegistry::new(Box::new(store.clone()));
        let mut patch = polkadot_patch("alice");
        patch.balance = Some(1.5);
        registry.upsert("addr-1", patch).await.unwrap();
        registry.select(0).await;

        let mut restored = AccountRegistry::new(Box::new(store));
        restored.restore().await;
        assert_eq!(restored.len(), 1);
        let account = restored.get("addr-1").unwrap();
        assert_eq!(account.balance, Some(1.5));
        assert_eq!(account.name.as_deref(), Some("alice"));
        assert_eq!(account.wallet_type.as_deref(), Some("test-wallet"));
        // Signer capabilities are ephemeral and absent after a reload.
        assert!(account.signer.is_none());
        assert_eq!(restored.selected_index(), 0);
    }

    #[tokio::test]
    async fn corrupt_snapshot_restores_as_empty() {
        let store = MemorySnapshotStore::new();
        store.save("accounts", "{not json").await.unwrap();
        store.save("selected_account", "three").await.unwrap();

        let mut registry = AccountRegistry::new(Box::new(store));
        registry.restore().await;
        assert!(registry.is_empty());
        assert_eq!(registry.selected_index(), 0);
    }

    #[tokio::test]
    async fn clear_purges_persisted_state() {
        let store = MemorySnapshotStore::new();
        let mut registry = AccountRegistry::new(Box::new(store.clone()));
        registry.upsert("addr-1", polkadot_patch("alice")).await.unwrap();
        registry.select(1).await;

        registry.clear().await;
        assert!(registry.is_empty());
        assert_eq!(registry.selected_index(), 0);
        assert_eq!(store.load("accounts").await.unwrap(), None);
        assert_eq!(store.load("selected_account").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_where_purges_only_matching_records() {
        let mut registry = registry();
        registry
            .upsert(
                "0xeee",
                AccountPatch {
                    signer_type: Some(SignerType::Ethereum),
                    ..AccountPatch::default()
                },
            )
            .await
            .unwrap();
        registry.upsert("addr-1", polkadot_patch("alice")).await.unwrap();
        registry.upsert("addr-2", polkadot_patch("bob")).await.unwrap();

        let removed = registry
            .remove_where(|a| a.signer_type == SignerType::Ethereum)
            .await;
        assert_eq!(removed, 1);
        assert_eq!(registry.len(), 2);
        assert!(registry.accounts().iter().all(|a| a.signer_type == SignerType::Polkadot));
    }
}
