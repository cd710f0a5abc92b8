//! Account Synchronization Module
//!
//! This module provides the logic that keeps the account registry consistent
//! with its wallet sources. It is composed of two submodules:
//!
//! - `orchestrator`: The coordinator that queries wallet providers and the
//!   balance oracle and merges results into the registry.
//! - `events`: External trigger types and the loop that maps each trigger to
//!   an orchestrator pass.
//!
//! Each wallet source is reconciled independently; a failure in one source's
//! pass never blocks or corrupts another's. Scheduling is explicit: the
//! embedding application emits triggers, and the trigger loop runs the
//! matching pass, decoupled from any UI lifecycle.

/// External triggers that schedule synchronization passes
pub mod events;
/// Coordinator for balance refresh and wallet-source reconciliation
pub mod orchestrator;

pub use events::{SyncTrigger, run_trigger_loop, trigger_channel};
pub use orchestrator::{ReinitReport, SyncOrchestrator};
