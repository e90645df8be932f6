//! Source line resolution
//!
//! For ordinary code the line table row covering the address is the answer.
//! Inside an inlined body that row describes the inlined function, and the
//! row marking the expansion boundary often carries line 0. To attribute the
//! address to its call site instead, the row just before the covering one is
//! used; when that row has line 0, the row after the covering one is tried.
//! This is a heuristic and can be off by one row on unusual line tables.

use super::debug_info::{DebugInfo, LineRow, LineTable};
use crate::domain::{SourceLine, SymbolizeError};
use log::debug;

/// Resolve the source file and line for `pc`
///
/// # Errors
/// Returns [`SymbolizeError::SeekFailed`] if the line table has no row for
/// `pc`, or, for inlined code, no row before the covering one
pub fn resolve_line<D>(
    debug_info: &D,
    pc: u64,
    is_inline: bool,
) -> Result<SourceLine, SymbolizeError>
where
    D: DebugInfo + ?Sized,
{
    let table = debug_info.line_table(pc)?;
    let row = if is_inline { inline_row(&table, pc)? } else { covering_row(&table, pc)?.1 };

    Ok(SourceLine { file: row.file.to_string(), line: row.line })
}

fn covering_row(table: &LineTable, pc: u64) -> Result<(usize, &LineRow), SymbolizeError> {
    table
        .seek_pc(pc)
        .and_then(|idx| table.row(idx).map(|row| (idx, row)))
        .ok_or_else(|| SymbolizeError::seek(pc, "no line table row covers address"))
}

fn inline_row(table: &LineTable, pc: u64) -> Result<&LineRow, SymbolizeError> {
    let (idx, row) = covering_row(table, pc)?;

    let before = row
        .address
        .checked_sub(1)
        .ok_or_else(|| SymbolizeError::seek(pc, "inlined row starts at address 0"))?;
    let (_, previous) = covering_row(table, before)?;

    if previous.line != 0 {
        return Ok(previous);
    }

    // The call site has no line; fall back to the row after the covering one
    match table.next(idx) {
        Some(next) if next.line != 0 => {
            debug!("0x{pc:x}: previous row has line 0, using next row (line {})", next.line);
            Ok(next)
        }
        _ => Ok(row),
    }
}
