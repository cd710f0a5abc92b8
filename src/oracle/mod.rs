//! Balance oracle integration module
//!
//! This module provides the contract and REST client for the external balance
//! oracle. The oracle reports, for a single chain address, the raw available
//! balance in base units together with the decimal precision of that chain.

/// REST client implementing the balance oracle contract
mod client;
/// Type definitions for oracle responses and errors
mod types;

pub use client::{BalanceOracle, HttpBalanceOracle};
pub use types::*;
