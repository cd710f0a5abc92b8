//! Multi-chain account registry and synchronization.
//!
//! This crate reconciles accounts arriving asynchronously from heterogeneous
//! wallet sources — one Ethereum-style connection plus any number of named
//! Polkadot-style wallets — into a single persisted registry with an
//! index-based selection model. Balances are refreshed through an external
//! balance oracle; signer capabilities are re-acquired from wallet providers
//! on every reinitialization pass and never persisted.

pub mod accounts;
pub mod oracle;
pub mod provider;
pub mod utils;
