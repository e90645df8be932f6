//! Access to a module's debug information
//!
//! The resolver only needs two things from the debug format: the entries of
//! the compile unit that covers an address, and that unit's line table.
//! [`DebugInfo`] is the seam between the two. The DWARF implementation lives
//! in [`super::dwarf`].

use crate::domain::SymbolizeError;
use std::ops::{ControlFlow, Range};
use std::sync::Arc;

/// Tag of a debug information entry, reduced to the kinds the resolver cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTag {
    CompileUnit,
    Subprogram,
    InlinedSubroutine,
    Other,
}

/// One debug information entry and the address ranges it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
    pub tag: EntryTag,
    pub ranges: Vec<Range<u64>>,
}

impl DebugEntry {
    /// The entry's range if it covers exactly one contiguous range
    #[must_use]
    pub fn single_range(&self) -> Option<&Range<u64>> {
        match self.ranges.as_slice() {
            [range] => Some(range),
            _ => None,
        }
    }
}

/// Debug information of one loaded module
///
/// Implementations are immutable once built, so queries may run from any
/// number of threads at once.
pub trait DebugInfo: Send + Sync {
    /// Visit the entries of the compile unit covering `pc`
    ///
    /// Entries are passed in depth-first order, the unit's own root entry
    /// excluded, until `visit` breaks or the unit ends.
    ///
    /// # Errors
    /// Returns [`SymbolizeError::SeekFailed`] if no compile unit covers `pc`
    fn walk_unit(
        &self,
        pc: u64,
        visit: &mut dyn FnMut(&DebugEntry) -> ControlFlow<()>,
    ) -> Result<(), SymbolizeError>;

    /// Line table of the compile unit covering `pc`
    ///
    /// # Errors
    /// Returns [`SymbolizeError::SeekFailed`] if no compile unit covers `pc`
    /// or its line program cannot be decoded
    fn line_table(&self, pc: u64) -> Result<Arc<LineTable>, SymbolizeError>;
}

/// A row of a line-number table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRow {
    pub address: u64,
    pub file: Arc<str>,
    pub line: u32,
    /// Marks the first address past the end of a sequence
    pub end_sequence: bool,
}

/// Decoded line-number table, rows kept in program order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTable {
    rows: Vec<LineRow>,
    /// Non-empty sequences sorted by start address
    sequences: Vec<Sequence>,
}

/// Rows `rows` cover the addresses in `range`; the end row is excluded
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sequence {
    range: Range<u64>,
    rows: Range<usize>,
}

impl LineTable {
    #[must_use]
    pub fn new(rows: Vec<LineRow>) -> Self {
        let mut sequences = Vec::new();
        let mut start = 0;
        for (idx, row) in rows.iter().enumerate() {
            if !row.end_sequence {
                continue;
            }
            // Empty sequences cover nothing
            if idx > start && rows[start].address < row.address {
                let range = rows[start].address..row.address;
                sequences.push(Sequence { range, rows: start..idx });
            }
            start = idx + 1;
        }
        sequences.sort_by_key(|seq| seq.range.start);

        Self { rows, sequences }
    }

    /// Index of the row covering `pc`
    ///
    /// A row covers the addresses from its own up to (excluding) the address
    /// of the row after it in the same sequence.
    #[must_use]
    pub fn seek_pc(&self, pc: u64) -> Option<usize> {
        let after = self.sequences.partition_point(|seq| seq.range.start <= pc);
        let seq = self.sequences[..after].last().filter(|seq| pc < seq.range.end)?;

        let rows = &self.rows[seq.rows.clone()];
        let after = rows.partition_point(|row| row.address <= pc);
        after.checked_sub(1).map(|offset| seq.rows.start + offset)
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&LineRow> {
        self.rows.get(index)
    }

    /// The row following `index` in program order
    #[must_use]
    pub fn next(&self, index: usize) -> Option<&LineRow> {
        self.rows.get(index.checked_add(1)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// In-memory [`DebugInfo`] for unit tests
#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    pub(crate) struct FakeUnit {
        pub range: Range<u64>,
        pub entries: Vec<DebugEntry>,
        pub lines: Arc<LineTable>,
    }

    #[derive(Default)]
    pub(crate) struct FakeDebugInfo {
        pub units: Vec<FakeUnit>,
    }

    impl FakeDebugInfo {
        pub(crate) fn single_unit(
            range: Range<u64>,
            entries: Vec<DebugEntry>,
            rows: Vec<LineRow>,
        ) -> Self {
            Self { units: vec![FakeUnit { range, entries, lines: Arc::new(LineTable::new(rows)) }] }
        }

        fn unit(&self, pc: u64) -> Result<&FakeUnit, SymbolizeError> {
            self.units
                .iter()
                .find(|unit| unit.range.contains(&pc))
                .ok_or_else(|| SymbolizeError::seek(pc, "no compile unit covers address"))
        }
    }

    impl DebugInfo for FakeDebugInfo {
        fn walk_unit(
            &self,
            pc: u64,
            visit: &mut dyn FnMut(&DebugEntry) -> ControlFlow<()>,
        ) -> Result<(), SymbolizeError> {
            for entry in &self.unit(pc)?.entries {
                if visit(entry).is_break() {
                    break;
                }
            }
            Ok(())
        }

        fn line_table(&self, pc: u64) -> Result<Arc<LineTable>, SymbolizeError> {
            Ok(Arc::clone(&self.unit(pc)?.lines))
        }
    }

    pub(crate) fn row(address: u64, file: &str, line: u32) -> LineRow {
        LineRow { address, file: Arc::from(file), line, end_sequence: false }
    }

    pub(crate) fn end(address: u64) -> LineRow {
        LineRow { address, file: Arc::from(""), line: 0, end_sequence: true }
    }

    pub(crate) fn entry(tag: EntryTag, ranges: &[Range<u64>]) -> DebugEntry {
        DebugEntry { tag, ranges: ranges.to_vec() }
    }
}
