//! Structured error types for addrline
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Errors are `Clone` so the module cache can hand out the same failure to
//! every caller that asks for a path which already failed to parse.

use std::io;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SymbolizeError {
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("Failed to parse {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("No symbol at or below address 0x{0:x}")]
    AddressNotFound(u64),

    #[error("Symbol {0} not found")]
    SymbolNotFound(String),

    #[error("No debug entry for address 0x{address:x}: {reason}")]
    SeekFailed { address: u64, reason: String },
}

/// Coarse classification of a [`SymbolizeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Parse,
    NotFound,
    Seek,
}

impl SymbolizeError {
    pub(crate) fn open(path: &str, source: io::Error) -> Self {
        Self::OpenFailed { path: path.to_string(), source: Arc::new(source) }
    }

    pub(crate) fn parse(path: &str, reason: impl ToString) -> Self {
        Self::ParseFailed { path: path.to_string(), reason: reason.to_string() }
    }

    pub(crate) fn seek(address: u64, reason: impl ToString) -> Self {
        Self::SeekFailed { address, reason: reason.to_string() }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OpenFailed { .. } => ErrorKind::Open,
            Self::ParseFailed { .. } => ErrorKind::Parse,
            Self::AddressNotFound(_) | Self::SymbolNotFound(_) => ErrorKind::NotFound,
            Self::SeekFailed { .. } => ErrorKind::Seek,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_not_found_display() {
        let err = SymbolizeError::AddressNotFound(0x40);
        assert_eq!(err.to_string(), "No symbol at or below address 0x40");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_open_error_keeps_source() {
        let err = SymbolizeError::open(
            "/usr/lib/libfoo.so",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("/usr/lib/libfoo.so"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.kind(), ErrorKind::Open);
    }

    #[test]
    fn test_cloned_error_has_same_kind() {
        let err = SymbolizeError::parse("/bin/stripped", "missing .debug_info section");
        let cached = err.clone();
        assert_eq!(cached.kind(), ErrorKind::Parse);
        assert_eq!(cached.to_string(), err.to_string());
    }
}
