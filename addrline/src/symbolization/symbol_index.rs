//! Address-sorted symbol index with floor lookup

use std::collections::BTreeMap;

/// A symbol table record as read from the binary
///
/// `info` is the raw classification byte (ELF `st_info`: binding and type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSymbol<'a> {
    pub name: &'a str,
    pub address: u64,
    pub info: u8,
}

impl RawSymbol<'_> {
    /// Whether this record belongs in the index
    ///
    /// Unnamed symbols, symbols without any classification and symbols at
    /// address 0 are left out.
    #[must_use]
    pub fn is_indexable(&self) -> bool {
        !self.name.is_empty() && self.info != 0 && self.address > 0
    }
}

/// An indexed symbol; `name` is the raw (possibly mangled) name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub address: u64,
    pub name: String,
}

/// Symbols of one binary, sorted by ascending address
///
/// Each address maps to exactly one entry. When several records share an
/// address, the one that came last in the symbol table wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndex {
    entries: Vec<SymbolEntry>,
}

impl SymbolIndex {
    /// Build the index from raw symbol records, skipping non-indexable ones
    pub fn build<'a, I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = RawSymbol<'a>>,
    {
        let mut by_address = BTreeMap::new();
        for symbol in symbols.into_iter().filter(|symbol| symbol.is_indexable()) {
            by_address.insert(symbol.address, symbol.name);
        }

        let entries = by_address
            .into_iter()
            .map(|(address, name)| SymbolEntry { address, name: name.to_string() })
            .collect();

        Self { entries }
    }

    /// Find the symbol enclosing `address`: the one with the greatest
    /// address that is less than or equal to it
    #[must_use]
    pub fn resolve(&self, address: u64) -> Option<&SymbolEntry> {
        // First position whose address is strictly greater, minus one
        let idx = self.entries.partition_point(|entry| entry.address <= address);
        idx.checked_sub(1).map(|idx| &self.entries[idx])
    }

    /// Look up the entry that starts exactly at `address`
    #[must_use]
    pub fn get(&self, address: u64) -> Option<&SymbolEntry> {
        self.entries
            .binary_search_by_key(&address, |entry| entry.address)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// First entry, in address order, whose raw name is exactly `name`
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Indexed addresses in ascending order
    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|entry| entry.address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
