//! DWARF implementation of [`DebugInfo`] on top of gimli
//!
//! Sections are copied into reference-counted buffers when the module is
//! loaded, so the parsed state owns its data and can be shared across
//! threads. Compile unit address ranges are indexed up front; line tables
//! are decoded the first time an address in their unit is queried.

use super::debug_info::{DebugEntry, DebugInfo, EntryTag, LineRow, LineTable};
use crate::domain::SymbolizeError;
use gimli::{EndianArcSlice, Reader as _, RunTimeEndian};
use log::{debug, warn};
use object::{Object, ObjectSection};
use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::{ControlFlow, Range};
use std::sync::{Arc, OnceLock};

type Reader = EndianArcSlice<RunTimeEndian>;

struct UnitSlot {
    unit: gimli::Unit<Reader>,
    ranges: Vec<Range<u64>>,
    lines: OnceLock<Arc<LineTable>>,
}

/// Parsed DWARF of one module
pub struct DwarfDebugInfo {
    dwarf: gimli::Dwarf<Reader>,
    units: Vec<UnitSlot>,
}

impl DwarfDebugInfo {
    /// Load the DWARF sections of an object file and index its compile units
    ///
    /// Missing sections load as empty. Compressed sections are inflated.
    ///
    /// # Errors
    /// Returns [`SymbolizeError::ParseFailed`] if a section cannot be
    /// decompressed, or a unit header or a unit's range list cannot be parsed
    pub fn load(obj: &object::File<'_>, path: &str) -> Result<Self, SymbolizeError> {
        let endian =
            if obj.is_little_endian() { RunTimeEndian::Little } else { RunTimeEndian::Big };

        let load_section = |id: gimli::SectionId| -> Result<Reader, SymbolizeError> {
            let data = match obj.section_by_name(id.name()) {
                Some(section) => section
                    .uncompressed_data()
                    .map_err(|err| SymbolizeError::parse(path, format!("{}: {err}", id.name())))?,
                None => Cow::Borrowed(&[][..]),
            };
            Ok(EndianArcSlice::new(Arc::from(&*data), endian))
        };

        let dwarf = gimli::Dwarf::load(load_section)?;
        Self::from_dwarf(dwarf).map_err(|err| SymbolizeError::parse(path, err))
    }

    /// Index the compile units of already loaded DWARF sections
    ///
    /// # Errors
    /// Returns an error if a unit header or a unit's range list cannot be parsed
    pub fn from_dwarf(dwarf: gimli::Dwarf<Reader>) -> Result<Self, gimli::Error> {
        let mut units = Vec::new();

        let mut headers = dwarf.units();
        while let Some(header) = headers.next()? {
            let unit = dwarf.unit(header)?;

            let mut ranges = Vec::new();
            let mut unit_ranges = dwarf.unit_ranges(&unit)?;
            while let Some(range) = unit_ranges.next()? {
                ranges.push(range.begin..range.end);
            }

            units.push(UnitSlot { unit, ranges, lines: OnceLock::new() });
        }

        debug!("Indexed {} compile units", units.len());
        Ok(Self { dwarf, units })
    }

    /// Number of compile units found in `.debug_info`
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn slot_for(&self, pc: u64) -> Result<&UnitSlot, SymbolizeError> {
        self.units
            .iter()
            .find(|slot| slot.ranges.iter().any(|range| range.contains(&pc)))
            .ok_or_else(|| SymbolizeError::seek(pc, "no compile unit covers address"))
    }
}

impl DebugInfo for DwarfDebugInfo {
    fn walk_unit(
        &self,
        pc: u64,
        visit: &mut dyn FnMut(&DebugEntry) -> ControlFlow<()>,
    ) -> Result<(), SymbolizeError> {
        let unit = &self.slot_for(pc)?.unit;
        let mut cursor = unit.entries();
        let mut at_root = true;

        loop {
            let entry = match cursor.next_dfs() {
                Ok(Some((_, entry))) => entry,
                Ok(None) => break,
                Err(err) => {
                    warn!("0x{pc:x}: debug entry walk stopped early: {err}");
                    break;
                }
            };

            // The unit's own entry comes first
            if at_root {
                at_root = false;
                continue;
            }

            let ranges = match entry_ranges(&self.dwarf, unit, entry) {
                Ok(ranges) => ranges,
                Err(err) => {
                    warn!(
                        "0x{pc:x}: bad ranges at {:?}, walk stopped early: {err}",
                        entry.offset()
                    );
                    break;
                }
            };

            let entry = DebugEntry { tag: entry_tag(entry.tag()), ranges };
            if visit(&entry).is_break() {
                break;
            }
        }

        Ok(())
    }

    fn line_table(&self, pc: u64) -> Result<Arc<LineTable>, SymbolizeError> {
        let slot = self.slot_for(pc)?;
        if let Some(table) = slot.lines.get() {
            return Ok(Arc::clone(table));
        }

        let table =
            decode_lines(&self.dwarf, &slot.unit).map_err(|err| SymbolizeError::seek(pc, err))?;
        debug!("Decoded {} line rows for unit at {:?}", table.len(), slot.unit.header.offset());

        Ok(Arc::clone(slot.lines.get_or_init(|| Arc::new(table))))
    }
}

fn entry_tag(tag: gimli::DwTag) -> EntryTag {
    match tag {
        gimli::DW_TAG_compile_unit => EntryTag::CompileUnit,
        gimli::DW_TAG_subprogram => EntryTag::Subprogram,
        gimli::DW_TAG_inlined_subroutine => EntryTag::InlinedSubroutine,
        _ => EntryTag::Other,
    }
}

fn entry_ranges(
    dwarf: &gimli::Dwarf<Reader>,
    unit: &gimli::Unit<Reader>,
    entry: &gimli::DebuggingInformationEntry<'_, '_, Reader>,
) -> Result<Vec<Range<u64>>, gimli::Error> {
    let mut ranges = Vec::new();
    let mut iter = dwarf.die_ranges(unit, entry)?;
    while let Some(range) = iter.next()? {
        ranges.push(range.begin..range.end);
    }
    Ok(ranges)
}

fn decode_lines(
    dwarf: &gimli::Dwarf<Reader>,
    unit: &gimli::Unit<Reader>,
) -> Result<LineTable, gimli::Error> {
    let Some(program) = unit.line_program.clone() else {
        return Ok(LineTable::default());
    };

    let mut files: HashMap<u64, Arc<str>> = HashMap::new();
    let mut rows = Vec::new();

    let mut program_rows = program.rows();
    while let Some((header, row)) = program_rows.next_row()? {
        let file = match files.get(&row.file_index()) {
            Some(file) => Arc::clone(file),
            None => {
                let file: Arc<str> = file_path(dwarf, unit, header, row.file_index())?.into();
                files.insert(row.file_index(), Arc::clone(&file));
                file
            }
        };

        rows.push(LineRow {
            address: row.address(),
            file,
            line: row.line().map_or(0, |line| u32::try_from(line.get()).unwrap_or(u32::MAX)),
            end_sequence: row.end_sequence(),
        });
    }

    Ok(LineTable::new(rows))
}

/// Full path of a line program file: compilation directory, include
/// directory and file name, with absolute components replacing what came before
fn file_path(
    dwarf: &gimli::Dwarf<Reader>,
    unit: &gimli::Unit<Reader>,
    header: &gimli::LineProgramHeader<Reader>,
    index: u64,
) -> Result<String, gimli::Error> {
    let Some(file) = header.file(index) else {
        return Ok(String::new());
    };

    let mut path = match &unit.comp_dir {
        Some(comp_dir) => comp_dir.to_string_lossy()?.into_owned(),
        None => String::new(),
    };

    // Directory 0 is the compilation directory itself
    if file.directory_index() != 0 {
        if let Some(directory) = file.directory(header) {
            push_path(&mut path, &dwarf.attr_string(unit, directory)?.to_string_lossy()?);
        }
    }

    push_path(&mut path, &dwarf.attr_string(unit, file.path_name())?.to_string_lossy()?);
    Ok(path)
}

fn push_path(path: &mut String, component: &str) {
    if component.starts_with('/') || has_windows_root(component) {
        *path = component.to_string();
        return;
    }

    let separator = if has_windows_root(path) { '\\' } else { '/' };
    if !path.is_empty() && !path.ends_with(separator) {
        path.push(separator);
    }
    path.push_str(component);
}

fn has_windows_root(path: &str) -> bool {
    path.starts_with('\\') || path.get(1..3) == Some(":\\")
}
