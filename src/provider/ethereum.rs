use super::{EthereumProvider, ProviderError};
use tokio::sync::Mutex;

/// Ethereum-style provider whose connection state is set by the embedding
/// application. The synchronization core never connects or disconnects; it
/// only observes the current address through [`EthereumProvider`].
pub struct WatchedEthereumProvider {
    address: Mutex<Option<String>>,
}

impl WatchedEthereumProvider {
    pub fn new() -> Self {
        Self {
            address: Mutex::new(None),
        }
    }

    /// Record a connection change. `None` means disconnected.
    pub async fn set_address(&self, address: Option<String>) {
        *self.address.lock().await = address;
    }
}

impl Default for WatchedEthereumProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EthereumProvider for WatchedEthereumProvider {
    async fn active_address(&self) -> Result<Option<String>, ProviderError> {
        Ok(self.address.lock().await.clone())
    }
}
