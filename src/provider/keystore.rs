use super::{PolkadotProvider, ProviderAccount, ProviderError, Signer, SignerHandle};
use crate::utils::ss58;

use ed25519_dalek::{Signer as DalekSigner, SigningKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// One account entry in a keystore file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreEntry {
	/// SS58 address of the account.
	pub address: String,
	/// Optional display label.
	#[serde(default)]
	pub name: Option<String>,
	/// Hex-encoded 32-byte ed25519 seed.
	pub seed: String,
}

/// Serialized form of one wallet's keystore, `{dir}/{wallet}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreFile {
	pub wallet: String,
	pub accounts: Vec<KeystoreEntry>,
}

/// Polkadot-style provider backed by per-wallet JSON keystore files.
///
/// Each named wallet maps to a single file in the keystore directory. Entries
/// with an undecodable address or seed are skipped with a warning rather than
/// failing the whole listing.
pub struct FileKeystoreProvider {
	dir: PathBuf,
}

impl FileKeystoreProvider {
	pub fn new(dir: PathBuf) -> Self {
		Self { dir }
	}

	fn keystore_path(&self, wallet_type: &str) -> PathBuf {
		self.dir.join(format!("{wallet_type}.json"))
	}
}

#[async_trait::async_trait]
impl PolkadotProvider for FileKeystoreProvider {
	async fn list_accounts(
		&self,
		wallet_type: &str,
	) -> Result<HashMap<String, ProviderAccount>, ProviderError> {
		let path = self.keystore_path(wallet_type);
		if !path.exists() {
			return Err(ProviderError::WalletUnavailable(wallet_type.to_string()));
		}

		let content = tokio::fs::read_to_string(&path).await?;
		let keystore: KeystoreFile = serde_json::from_str(&content)?;

		let mut accounts = HashMap::new();
		for entry in keystore.accounts {
			let normalized = match ss58::normalize(&entry.address) {
				Ok(normalized) => normalized,
				Err(e) => {
					warn!(
						"Skipping keystore entry with invalid address {}: {}",
						entry.address, e
					);
					continue;
				}
			};
			let signer = match KeystoreSigner::from_seed_hex(&entry.seed) {
				Ok(signer) => SignerHandle::new(signer),
				Err(e) => {
					warn!(
						"Skipping keystore entry {} with unusable seed: {}",
						entry.address, e
					);
					continue;
				}
			};
			accounts.insert(
				normalized,
				ProviderAccount {
					address: entry.address,
					name: entry.name,
					signer,
				},
			);
		}

		debug!(
			"Keystore {} reported {} account(s)",
			wallet_type,
			accounts.len()
		);
		Ok(accounts)
	}
}

/// ed25519 signer materialized from a keystore seed.
pub struct KeystoreSigner {
	key: SigningKey,
}

impl KeystoreSigner {
	pub fn from_seed_hex(seed_hex: &str) -> Result<Self, ProviderError> {
		let bytes = hex::decode(seed_hex.trim())
			.map_err(|e| ProviderError::Keystore(format!("invalid seed hex: {e}")))?;
		let seed: [u8; 32] = bytes
			.as_slice()
			.try_into()
			.map_err(|_| ProviderError::Keystore("seed must be 32 bytes".to_string()))?;
		Ok(Self {
			key: SigningKey::from_bytes(&seed),
		})
	}
}

impl Signer for KeystoreSigner {
	fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, ProviderError> {
		Ok(self.key.sign(payload).to_bytes().to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn demo_keystore(dir: &std::path::Path) -> KeystoreFile {
		let seed = [5u8; 32];
		let key = SigningKey::from_bytes(&seed);
		let address = ss58::encode(42, &key.verifying_key().to_bytes()).unwrap();
		let keystore = KeystoreFile {
			wallet: "test-wallet".to_string(),
			accounts: vec![
				KeystoreEntry {
					address,
					name: Some("Alice".to_string()),
					seed: hex::encode(seed),
				},
				KeystoreEntry {
					address: "garbage".to_string(),
					name: None,
					seed: hex::encode([6u8; 32]),
				},
			],
		};
		std::fs::write(
			dir.join("test-wallet.json"),
			serde_json::to_string_pretty(&keystore).unwrap(),
		)
		.unwrap();
		keystore
	}

	#[tokio::test]
	async fn lists_accounts_keyed_by_normalized_address() {
		let dir = tempfile::tempdir().unwrap();
		let keystore = demo_keystore(dir.path());
		let provider = FileKeystoreProvider::new(dir.path().to_path_buf());

		let accounts = provider.list_accounts("test-wallet").await.unwrap();
		// The undecodable entry is skipped, not fatal.
		assert_eq!(accounts.len(), 1);

		let normalized = ss58::normalize(&keystore.accounts[0].address).unwrap();
		let account = accounts.get(&normalized).expect("account under normalized key");
		assert_eq!(account.address, keystore.accounts[0].address);
		assert_eq!(account.name.as_deref(), Some("Alice"));
		assert!(!account.signer.sign(b"payload").unwrap().is_empty());
	}

	#[tokio::test]
	async fn missing_keystore_is_wallet_unavailable() {
		let dir = tempfile::tempdir().unwrap();
		let provider = FileKeystoreProvider::new(dir.path().to_path_buf());
		let result = provider.list_accounts("absent").await;
		assert!(matches!(result, Err(ProviderError::WalletUnavailable(w)) if w == "absent"));
	}
}
