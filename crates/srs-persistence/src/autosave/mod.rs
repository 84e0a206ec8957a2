//! Auto-save for rating sessions.
//!
//! Provides:
//! - `AutoSaveScheduler` - Debounced writes plus an unconditional flush
//! - `SaveTracker` - Unsaved-change and completion bookkeeping
//! - `AutoSaveConfig` - User settings for auto-save behavior

mod config;
mod scheduler;
mod tracker;

pub use config::AutoSaveConfig;
pub use scheduler::{AutoSaveScheduler, SavePayload};
pub use tracker::SaveTracker;
