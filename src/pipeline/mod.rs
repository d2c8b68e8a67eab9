pub mod assemble;
pub mod decode;
pub mod extraction;
pub mod normalize;

pub use assemble::*;
pub use decode::*;
pub use extraction::ExtractionError;
pub use normalize::*;

use thiserror::Error;

use crate::ledger::LedgerError;

/// Request-level error taxonomy. Decode failures never appear here; they
/// degrade into the fallback payload inside the decoder.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// A mandatory field is missing from the extraction. User-correctable.
    #[error("Missing required field: {0}")]
    Validation(String),

    /// The counterparty could not be resolved against the registry.
    #[error("No registry match for counterparty: {0}")]
    EntityNotFound(String),

    /// The extraction oracle call itself failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The ledger store rejected a lookup or creation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Internal invariant violation during draft assembly.
    #[error("Draft assembly failed: {0}")]
    Assembly(String),
}
