pub mod config;
pub mod error;
pub mod normalize;
pub mod session;
pub mod table;

// Re-export common error type
pub use error::{RealtyError, Result};
pub use normalize::{normalize, parse_payload};
pub use table::derive_columns;
