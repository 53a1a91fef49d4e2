//! General Election Voting System — election ledger and tabulation engine
//!
//! Records voter registrations against single-use credentials, accepts one
//! vote per eligible voter while the election is ongoing, and tabulates
//! seats once it concludes. HTTP routing, rendering, and session handling
//! live in adapter crates; this one holds the invariants.

pub mod config;
pub mod crypto;
pub mod errors;
pub mod ledger;
pub mod seed;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, ErrorClass, Result};
pub use ledger::ElectionLedger;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the election ledger with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gevs=info".into()),
        )
        .init();

    tracing::info!("🗳️  Election ledger v{} initialized", VERSION);
    Ok(())
}
