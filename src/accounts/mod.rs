pub mod persistence;
pub mod registry;
pub mod sync;
pub mod types;

pub use registry::AccountRegistry;
pub use sync::SyncOrchestrator;
pub use types::*;
