//! ledgerscan turns scanned invoice, purchase order and sales order text
//! into validated records in a business ledger.
//!
//! Pipeline: source text → extraction oracle → resilient decode → locale
//! normalization + entity resolution → validated draft → single ledger
//! submission. The upstream producer (an LLM) is untrusted and schema-free;
//! the downstream ledger never receives a structurally invalid record.

pub mod api;
pub mod config;
pub mod ledger;
pub mod models;
pub mod pipeline;
pub mod service;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, falling back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
