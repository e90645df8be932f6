//! Domain model for addrline
//!
//! This module contains the query result types and the structured error
//! returned by every fallible library operation.

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{ResolvedLocation, SourceLine};

pub use errors::{ErrorKind, SymbolizeError};
