//!
//! REST client for the external balance oracle.
//!
//! The oracle exposes one endpoint per address returning the raw available
//! balance and decimal precision. All methods are async and designed for use
//! with Tokio. Transport failures propagate as [`OracleError`] and are never
//! retried here; callers decide what a failed fetch means for their state.

use super::types::{BalanceInfo, OracleError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Source of current balance information for a chain address.
#[async_trait::async_trait]
pub trait BalanceOracle: Send + Sync {
	/// Fetch the raw balance and decimal precision for `address`.
	async fn get(&self, address: &str) -> Result<BalanceInfo, OracleError>;
}

/// HTTP implementation of [`BalanceOracle`] against a REST indexer.
#[derive(Clone)]
pub struct HttpBalanceOracle {
	/// The underlying HTTP client.
	http_client: Client,
	/// Base URL of the oracle REST endpoint.
	base_url: String,
}

impl HttpBalanceOracle {
	/// Create a new oracle client for the given base URL.
	pub fn new(base_url: String) -> Self {
		let http_client = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.expect("Failed to create HTTP client");

		Self {
			http_client,
			base_url,
		}
	}

	fn balance_url(&self, address: &str) -> String {
		format!(
			"{}/addresses/{}/balance",
			self.base_url.trim_end_matches('/'),
			address
		)
	}
}

#[async_trait::async_trait]
impl BalanceOracle for HttpBalanceOracle {
	async fn get(&self, address: &str) -> Result<BalanceInfo, OracleError> {
		let url = self.balance_url(address);
		debug!("Fetching balance from {}", url);

		let response = self.http_client.get(&url).send().await?;
		if !response.status().is_success() {
			return Err(OracleError::BadStatus(response.status()));
		}

		let info: BalanceInfo = response.json().await?;
		if info.available.is_empty() || !info.available.chars().all(|c| c.is_ascii_digit()) {
			return Err(OracleError::MalformedPayload(format!(
				"available balance {:?} is not an integer string",
				info.available
			)));
		}

		Ok(info)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_balance_urls_without_double_slashes() {
		let oracle = HttpBalanceOracle::new("http://localhost:4300/".to_string());
		assert_eq!(
			oracle.balance_url("0xabc"),
			"http://localhost:4300/addresses/0xabc/balance"
		);
	}
}
