//! Refresh cycle: loading the PnL table and caching it with a TTL.

pub mod loader;
pub mod service;

pub use loader::{CsvLoader, LiveLoader, PnlLoader, RefreshError};
pub use service::{PnlService, RefreshState};
