pub mod error;
pub mod router;
pub mod types;

pub use error::*;
pub use router::*;
pub use types::*;
