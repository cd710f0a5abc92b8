//! Synchronization orchestrator for the account registry.
//!
//! The orchestrator drives balance refresh and wallet-source reconciliation
//! against the registry. Each operation is one pass: it queries the relevant
//! wallet provider and/or the balance oracle, then merges results through
//! the registry's patch-based upsert. Per-account failures are caught and
//! logged where they occur so one account can never abort the rest of a
//! batch; only the empty-connect case escalates to the caller.
//!
//! Concurrent passes are safe by construction: upserts to different
//! addresses commute, and racing writes to the same address are
//! last-write-completes-wins with no fencing.

use crate::accounts::registry::AccountRegistry;
use crate::accounts::types::{AccountPatch, AccountSyncError, SignerType};
use crate::oracle::BalanceOracle;
use crate::provider::{EthereumProvider, PolkadotProvider, ProviderAccount};
use crate::utils;

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Coordinates wallet providers, the balance oracle, and the registry.
#[derive(Clone)]
pub struct SyncOrchestrator {
    registry: Arc<Mutex<AccountRegistry>>,
    oracle: Arc<dyn BalanceOracle>,
    ethereum: Arc<dyn EthereumProvider>,
    polkadot: Arc<dyn PolkadotProvider>,
}

impl SyncOrchestrator {
    pub fn new(
        registry: Arc<Mutex<AccountRegistry>>,
        oracle: Arc<dyn BalanceOracle>,
        ethereum: Arc<dyn EthereumProvider>,
        polkadot: Arc<dyn PolkadotProvider>,
    ) -> Self {
        Self {
            registry,
            oracle,
            ethereum,
            polkadot,
        }
    }

    /// Shared handle to the registry this orchestrator mutates.
    pub fn registry(&self) -> Arc<Mutex<AccountRegistry>> {
        self.registry.clone()
    }

    /// Observe the Ethereum-style provider and reconcile the registry with
    /// whatever it currently reports.
    pub async fn sync_ethereum_from_provider(&self) -> Result<(), AccountSyncError> {
        let address = self.ethereum.active_address().await?;
        self.handle_ethereum_address(address.as_deref()).await
    }

    /// React to an address-change event: a present address refreshes the
    /// single Ethereum-style record, absence purges all Ethereum-style
    /// records (disconnect).
    pub async fn handle_ethereum_address(
        &self,
        address: Option<&str>,
    ) -> Result<(), AccountSyncError> {
        match address {
            Some(address) if !address.trim().is_empty() => self.sync_ethereum(address).await,
            _ => {
                let removed = self
                    .registry
                    .lock()
                    .await
                    .remove_where(|a| a.signer_type == SignerType::Ethereum)
                    .await;
                if removed > 0 {
                    info!("Removed {} Ethereum-style account(s) on disconnect", removed);
                }
                Ok(())
            }
        }
    }

    /// Refresh the single Ethereum-style record for the active address.
    ///
    /// The address is canonicalized first; a failed balance fetch still
    /// creates or keeps the record, leaving the previous balance in place.
    pub async fn sync_ethereum(&self, address: &str) -> Result<(), AccountSyncError> {
        let canonical = utils::normalize_evm_address(address);
        let balance = self.fetch_balance(&canonical).await;

        let patch = AccountPatch {
            signer_type: Some(SignerType::Ethereum),
            balance,
            ..AccountPatch::default()
        };
        self.registry.lock().await.upsert(&canonical, patch).await?;
        debug!("Synchronized Ethereum-style account {}", canonical);
        Ok(())
    }

    /// Connect a named Polkadot-style wallet and merge every account it
    /// reports in one batch.
    ///
    /// Zero reported addresses is terminal for this call: the registry is
    /// left untouched and [`AccountSyncError::NoAccountsFound`] carries the
    /// wallet name back to the caller. Balances are fetched before the
    /// registry lock is taken, so readers never observe a partial batch.
    pub async fn connect_polkadot_wallet(
        &self,
        wallet_type: &str,
    ) -> Result<usize, AccountSyncError> {
        let listed = self.polkadot.list_accounts(wallet_type).await?;
        if listed.is_empty() {
            warn!("No accounts found in {} or access was denied", wallet_type);
            return Err(AccountSyncError::NoAccountsFound {
                wallet: wallet_type.to_string(),
            });
        }

        let entries: Vec<(String, ProviderAccount)> = listed.into_iter().collect();
        let balances = join_all(
            entries
                .iter()
                .map(|(_, account)| self.fetch_balance(&account.address)),
        )
        .await;

        let mut registry = self.registry.lock().await;
        let count = entries.len();
        for ((normalized, account), balance) in entries.into_iter().zip(balances) {
            let ProviderAccount {
                address,
                name,
                signer,
            } = account;
            let patch = AccountPatch {
                signer_type: Some(SignerType::Polkadot),
                normalized_address: Some(normalized),
                wallet_type: Some(wallet_type.to_string()),
                name,
                balance,
                signer: Some(signer),
            };
            registry.upsert(&address, patch).await?;
        }

        info!("Connected wallet {} with {} account(s)", wallet_type, count);
        Ok(count)
    }

    /// Re-acquire signers and refresh balances for every registered
    /// Polkadot-style account.
    ///
    /// Each account's originating wallet is re-queried and matched by
    /// normalized address. A record the wallet no longer reports is kept
    /// unchanged and only logged; this pass never removes accounts. Failures
    /// are isolated per wallet and per account, and repeated invocation with
    /// no underlying change yields no observable change.
    pub async fn reinitialize_polkadot(&self) -> ReinitReport {
        let mut report = ReinitReport::default();

        // Snapshot what needs refreshing without holding the lock across
        // provider calls.
        let mut by_wallet: HashMap<String, Vec<(String, String)>> = HashMap::new();
        {
            let registry = self.registry.lock().await;
            for account in registry.accounts() {
                if account.signer_type != SignerType::Polkadot {
                    continue;
                }
                match &account.wallet_type {
                    Some(wallet_type) => by_wallet
                        .entry(wallet_type.clone())
                        .or_default()
                        .push((account.address.clone(), account.normalized_address.clone())),
                    None => {
                        warn!(
                            "Account {} has no originating wallet; keeping as-is",
                            account.address
                        );
                        report.stale += 1;
                    }
                }
            }
        }

        for (wallet_type, accounts) in by_wallet {
            let listed = match self.polkadot.list_accounts(&wallet_type).await {
                Ok(listed) => listed,
                Err(e) => {
                    warn!(
                        "Skipping wallet {} during reinitialization: {}",
                        wallet_type, e
                    );
                    report.failed += accounts.len();
                    continue;
                }
            };

            for (address, normalized) in accounts {
                match listed.get(&normalized) {
                    Some(live) => {
                        let balance = self.fetch_balance(&address).await;
                        let patch = AccountPatch {
                            name: live.name.clone(),
                            balance,
                            signer: Some(live.signer.clone()),
                            ..AccountPatch::default()
                        };
                        match self.registry.lock().await.upsert(&address, patch).await {
                            Ok(()) => report.refreshed += 1,
                            Err(e) => {
                                warn!("Failed to refresh account {}: {}", address, e);
                                report.failed += 1;
                            }
                        }
                    }
                    None => {
                        warn!(
                            "Wallet {} no longer reports address {}; keeping stale record",
                            wallet_type, address
                        );
                        report.stale += 1;
                    }
                }
            }
        }

        info!("Reinitialization complete: {}", report.summary());
        report
    }

    /// Drop every account and purge persisted state.
    pub async fn clear_accounts(&self) {
        self.registry.lock().await.clear().await;
    }

    /// Fetch and convert one balance. Any failure degrades to `None` so the
    /// account's previous balance stays in place.
    async fn fetch_balance(&self, address: &str) -> Option<f64> {
        match self.oracle.get(address).await {
            Ok(info) => match utils::units_to_balance(&info.available, info.decimals) {
                Some(balance) => Some(balance),
                None => {
                    warn!(
                        "Oracle returned unparsable balance {:?} for {}",
                        info.available, address
                    );
                    None
                }
            },
            Err(e) => {
                warn!("Balance fetch failed for {}: {}", address, e);
                None
            }
        }
    }
}

/// Outcome of one reinitialization pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReinitReport {
    /// Accounts whose signer and balance were refreshed.
    pub refreshed: usize,
    /// Accounts the live listing no longer carries, kept unchanged.
    pub stale: usize,
    /// Accounts whose wallet could not be queried or whose refresh failed.
    pub failed: usize,
}

impl ReinitReport {
    /// Human-readable summary of the pass.
    pub fn summary(&self) -> String {
        format!(
            "{} refreshed, {} stale, {} failed",
            self.refreshed, self.stale, self.failed
        )
    }
}
