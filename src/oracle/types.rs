//! Types for balance oracle integration

use serde::{Deserialize, Serialize};

/// Balance information reported by the oracle for one address.
///
/// The conversion to whole units is `available / 10^decimals`; both fields
/// come from the same response and are never cached across fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceInfo {
    /// Raw available balance in base units, as an integer string.
    pub available: String,
    /// Decimal precision of the chain's base unit.
    pub decimals: u32,
}

/// Error types for balance oracle operations
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("oracle returned status {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("no data returned")]
    NoData,

    #[error("malformed balance payload: {0}")]
    MalformedPayload(String),
}
