//! Trigger system for account synchronization.
//!
//! Synchronization passes are scheduled explicitly: the embedding
//! application emits a [`SyncTrigger`] whenever something happened (an
//! address-change event, a user connecting a wallet, startup), and
//! [`run_trigger_loop`] maps each trigger to the matching orchestrator pass.
//! This keeps scheduling decoupled from any particular UI lifecycle.
//!
//! Errors from a pass are logged, but do not stop the loop from serving
//! later triggers. A caller that needs a pass's result — the empty-connect
//! failure in particular — invokes the orchestrator directly instead of
//! going through the queue.

use super::orchestrator::SyncOrchestrator;
use tokio::sync::mpsc;
use tracing::{error, info};

/// External events that schedule a synchronization pass.
#[derive(Debug, Clone)]
pub enum SyncTrigger {
    /// The Ethereum-style connection reported a new address, or none on
    /// disconnect.
    EthereumAddressChanged(Option<String>),
    /// The user connected the named Polkadot-style wallet.
    WalletConnected(String),
    /// Re-acquire signers and refresh balances for every known
    /// Polkadot-style account.
    Reinitialize,
    /// Drop all accounts and purge persisted state.
    ClearAccounts,
}

/// Create the channel feeding [`run_trigger_loop`].
pub fn trigger_channel() -> (
    mpsc::UnboundedSender<SyncTrigger>,
    mpsc::UnboundedReceiver<SyncTrigger>,
) {
    mpsc::unbounded_channel()
}

/// Drain triggers and run the matching orchestrator pass for each, until
/// every sender is dropped.
pub async fn run_trigger_loop(
    orchestrator: SyncOrchestrator,
    mut triggers: mpsc::UnboundedReceiver<SyncTrigger>,
) {
    while let Some(trigger) = triggers.recv().await {
        match trigger {
            SyncTrigger::EthereumAddressChanged(address) => {
                if let Err(e) = orchestrator.handle_ethereum_address(address.as_deref()).await {
                    error!("Ethereum sync failed: {}", e);
                }
            }
            SyncTrigger::WalletConnected(wallet) => {
                if let Err(e) = orchestrator.connect_polkadot_wallet(&wallet).await {
                    error!("Wallet {} connection failed: {}", wallet, e);
                }
            }
            SyncTrigger::Reinitialize => {
                orchestrator.reinitialize_polkadot().await;
            }
            SyncTrigger::ClearAccounts => orchestrator.clear_accounts().await,
        }
    }
    info!("Trigger channel closed, sync loop exiting");
}
