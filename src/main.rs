use multichain_account_sync::accounts::persistence::FileSnapshotStore;
use multichain_account_sync::accounts::registry::AccountRegistry;
use multichain_account_sync::accounts::sync::{
    SyncOrchestrator, SyncTrigger, run_trigger_loop, trigger_channel,
};
use multichain_account_sync::oracle::HttpBalanceOracle;
use multichain_account_sync::provider::{
    EthereumProvider, FileKeystoreProvider, KeystoreEntry, KeystoreFile, WatchedEthereumProvider,
};
use multichain_account_sync::utils::ss58;

use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

const DEMO_WALLET: &str = "demo-wallet";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!("Starting account sync service");

    let data_dir = PathBuf::from(
        std::env::var("ACCOUNT_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
    );
    let oracle_url = std::env::var("BALANCE_ORACLE_URL")
        .unwrap_or_else(|_| "http://localhost:4300".to_string());

    let keystore_dir = data_dir.join("wallets");
    if let Err(e) = seed_demo_keystore(&keystore_dir).await {
        error!("Failed to prepare demo keystore: {}", e);
        return;
    }

    let store = FileSnapshotStore::new(data_dir.join("state"));
    let mut registry = AccountRegistry::new(Box::new(store));
    registry.restore().await;
    info!("Registry restored with {} account(s)", registry.len());
    let registry = Arc::new(Mutex::new(registry));

    let oracle = Arc::new(HttpBalanceOracle::new(oracle_url));
    let ethereum = Arc::new(WatchedEthereumProvider::new());
    let polkadot = Arc::new(FileKeystoreProvider::new(keystore_dir));

    if let Ok(address) = std::env::var("ETHEREUM_ADDRESS") {
        ethereum.set_address(Some(address)).await;
    }

    let orchestrator = SyncOrchestrator::new(
        registry.clone(),
        oracle,
        ethereum.clone(),
        polkadot,
    );

    // Connect the demo wallet directly so an empty keystore surfaces as an
    // error rather than a log line.
    match orchestrator.connect_polkadot_wallet(DEMO_WALLET).await {
        Ok(count) => info!("Connected {} with {} account(s)", DEMO_WALLET, count),
        Err(e) => error!("Failed to connect {}: {}", DEMO_WALLET, e),
    }

    // Everything else goes through explicit triggers.
    let (triggers, receiver) = trigger_channel();
    let _ = triggers.send(SyncTrigger::Reinitialize);
    let active = ethereum.active_address().await.unwrap_or(None);
    let _ = triggers.send(SyncTrigger::EthereumAddressChanged(active));
    drop(triggers);
    run_trigger_loop(orchestrator, receiver).await;

    let registry = registry.lock().await;
    for (index, account) in registry.accounts().iter().enumerate() {
        info!(
            "[{}] {:?} {} name={} balance={}",
            index,
            account.signer_type,
            account.address,
            account.name.as_deref().unwrap_or("-"),
            account
                .balance
                .map(|b| b.to_string())
                .unwrap_or_else(|| "unsynced".to_string()),
        );
    }
    match registry.selected_account() {
        Some(account) => info!("Selected account: {}", account.address),
        None => info!("No selected account"),
    }
}

/// Write a two-account keystore for the demo wallet unless one exists.
async fn seed_demo_keystore(dir: &Path) -> Result<(), std::io::Error> {
    let path = dir.join(format!("{DEMO_WALLET}.json"));
    if path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir).await?;

    let mut accounts = Vec::new();
    for name in ["Alice", "Bob"] {
        let mut seed = [0u8; 32];
        rand::rng().fill(&mut seed);
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        let address = ss58::encode(42, &key.verifying_key().to_bytes())
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        accounts.push(KeystoreEntry {
            address,
            name: Some(name.to_string()),
            seed: hex::encode(seed),
        });
    }

    let keystore = KeystoreFile {
        wallet: DEMO_WALLET.to_string(),
        accounts,
    };
    let content = serde_json::to_string_pretty(&keystore).map_err(std::io::Error::other)?;
    tokio::fs::write(&path, content).await?;
    info!("Seeded demo keystore at {:?}", path);
    Ok(())
}
