//! Result types produced by a symbolization query

use serde::Serialize;
use std::fmt;

/// Source file and line attributed to an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub file: String,
    /// 0 means the debug data records no line for this address
    pub line: u32,
}

/// A resolved address
///
/// Built fresh for every query. `address` is the queried address, not the
/// address of the enclosing symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation {
    pub address: u64,
    pub module_path: String,
    pub function_name: String,
    pub file: String,
    pub line: u32,
    pub is_inline: bool,
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x} {} at {}:{}", self.address, self.function_name, self.file, self.line)?;
        if self.is_inline {
            write!(f, " (inlined)")?;
        }
        Ok(())
    }
}
