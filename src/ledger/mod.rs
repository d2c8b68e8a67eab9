pub mod memory;
pub mod resolver;
pub mod rpc;

pub use memory::*;
pub use resolver::*;
pub use rpc::*;

use thiserror::Error;

use crate::models::{CreatedRecord, DocumentDraft};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger store is unreachable at {0}")]
    Connection(String),

    #[error("Ledger store returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Ledger RPC fault: {0}")]
    Rpc(String),

    #[error("Ledger response could not be parsed: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// A registry entry as the ledger exposes it.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub id: i64,
    pub name: String,
}

/// A tax registry entry: identifier, display name, rate in percent.
#[derive(Debug, Clone)]
pub struct TaxRecord {
    pub id: i64,
    pub name: String,
    pub amount: f64,
}

/// External business-record store: partner/product/tax registries plus
/// single-shot document creation. The pipeline never mutates registry
/// entries; it only searches, creates products, and submits finished drafts.
pub trait LedgerStore: Send + Sync {
    fn search_partners(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError>;

    fn search_products(&self, query: &str) -> Result<Vec<EntityRecord>, LedgerError>;

    /// Create a minimal product record with the given name.
    fn create_product(&self, name: &str) -> Result<EntityRecord, LedgerError>;

    fn search_taxes(&self) -> Result<Vec<TaxRecord>, LedgerError>;

    /// Submit one fully assembled draft; returns the created record's
    /// identifier and display name.
    fn create_document(&self, draft: &DocumentDraft) -> Result<CreatedRecord, LedgerError>;
}
