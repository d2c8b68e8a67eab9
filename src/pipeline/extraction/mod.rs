pub mod client;
pub mod oracle;
pub mod prompt;

pub use client::*;
pub use oracle::*;
pub use prompt::*;

use thiserror::Error;

/// Faults of the extraction oracle call itself. Malformed completion
/// *content* never appears here; the decoder degrades it instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Extraction oracle is unreachable at {0}")]
    OracleConnection(String),

    #[error("Extraction oracle returned error (status {status}): {body}")]
    OracleStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Oracle response could not be parsed: {0}")]
    ResponseParsing(String),

    #[error("Oracle returned no usable completion text")]
    EmptyCompletion,
}
