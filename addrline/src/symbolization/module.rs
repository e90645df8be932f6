//! A loaded binary and the queries it answers

use super::debug_info::DebugInfo;
use super::dwarf::DwarfDebugInfo;
use super::inline::detect_inline;
use super::lines::resolve_line;
use super::names::resolve_name;
use super::symbol_index::{RawSymbol, SymbolIndex};
use crate::domain::{ResolvedLocation, SymbolizeError};
use log::{debug, info};
use object::{Object, ObjectSection, ObjectSymbol, ObjectSymbolTable, SymbolFlags};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Sections a module must carry to be symbolized
const REQUIRED_SECTIONS: [&str; 2] = [".debug_info", ".debug_line"];

/// Symbol index and debug information of one binary
///
/// Everything is parsed when the module is loaded and never changes
/// afterwards; queries only read.
pub struct LoadedModule {
    path: String,
    symbols: SymbolIndex,
    debug_info: Box<dyn DebugInfo>,
}

impl LoadedModule {
    /// Read and parse the binary at `path`
    ///
    /// # Errors
    /// Returns [`SymbolizeError::OpenFailed`] if the file cannot be read and
    /// [`SymbolizeError::ParseFailed`] if it is not an object file with a
    /// symbol table and DWARF line information
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SymbolizeError> {
        let path = path.as_ref().to_string_lossy().into_owned();
        let data = fs::read(&path).map_err(|err| SymbolizeError::open(&path, err))?;
        Self::from_bytes(path, &data)
    }

    /// Parse a binary read from `reader`; `path` names it in results and errors
    ///
    /// # Errors
    /// Same as [`LoadedModule::load`], with read errors reported as `OpenFailed`
    pub fn from_reader<R: Read>(
        mut reader: R,
        path: impl Into<String>,
    ) -> Result<Self, SymbolizeError> {
        let path = path.into();
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(|err| SymbolizeError::open(&path, err))?;
        Self::from_bytes(path, &data)
    }

    /// Parse an in-memory binary image
    ///
    /// # Errors
    /// Returns [`SymbolizeError::ParseFailed`] if the image is not an object
    /// file with a symbol table and DWARF line information
    pub fn from_bytes(path: impl Into<String>, data: &[u8]) -> Result<Self, SymbolizeError> {
        let path = path.into();
        let obj = object::File::parse(data).map_err(|err| SymbolizeError::parse(&path, err))?;

        let Some(symbol_table) = obj.symbol_table() else {
            return Err(SymbolizeError::parse(&path, "no symbol table"));
        };
        let symbols = SymbolIndex::build(symbol_table.symbols().filter_map(|symbol| {
            Some(RawSymbol {
                name: symbol.name().ok()?,
                address: symbol.address(),
                info: symbol_info(&symbol),
            })
        }));

        for section in REQUIRED_SECTIONS {
            if !obj.section_by_name(section).is_some_and(|s| s.size() > 0) {
                return Err(SymbolizeError::parse(&path, format!("missing {section} section")));
            }
        }
        let debug_info = DwarfDebugInfo::load(&obj, &path)?;

        info!(
            "Loaded {path}: {} symbols, {} compile units",
            symbols.len(),
            debug_info.unit_count()
        );
        Ok(Self::from_parts(path, symbols, debug_info))
    }

    /// Assemble a module from an already built index and debug information
    pub fn from_parts(
        path: impl Into<String>,
        symbols: SymbolIndex,
        debug_info: impl DebugInfo + 'static,
    ) -> Self {
        Self { path: path.into(), symbols, debug_info: Box::new(debug_info) }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolIndex {
        &self.symbols
    }

    /// Resolve `address` to its function, source line and inline status
    ///
    /// # Errors
    /// Returns [`SymbolizeError::AddressNotFound`] if no symbol starts at or
    /// below `address`, and [`SymbolizeError::SeekFailed`] if the debug
    /// information does not cover it
    pub fn query(&self, address: u64, demangle: bool) -> Result<ResolvedLocation, SymbolizeError> {
        let symbol =
            self.symbols.resolve(address).ok_or(SymbolizeError::AddressNotFound(address))?;
        let function_name = resolve_name(&symbol.name, demangle);

        let is_inline = detect_inline(self.debug_info.as_ref(), address)?;
        let source = resolve_line(self.debug_info.as_ref(), address, is_inline)?;
        debug!(
            "0x{address:x} -> {function_name} at {}:{} (symbol 0x{:x}, inline: {is_inline})",
            source.file, source.line, symbol.address
        );

        Ok(ResolvedLocation {
            address,
            module_path: self.path.clone(),
            function_name,
            file: source.file,
            line: source.line,
            is_inline,
        })
    }

    /// Resolve the start address of the symbol with raw name `name`
    ///
    /// # Errors
    /// Returns [`SymbolizeError::SymbolNotFound`] if no indexed symbol has
    /// that name, otherwise the errors of [`LoadedModule::query`]
    pub fn find_by_symbol_name(&self, name: &str) -> Result<ResolvedLocation, SymbolizeError> {
        let symbol = self
            .symbols
            .find_by_name(name)
            .ok_or_else(|| SymbolizeError::SymbolNotFound(name.to_string()))?;
        self.query(symbol.address, false)
    }
}

/// Raw ELF `st_info` of a symbol
fn symbol_info<'data, S: ObjectSymbol<'data>>(symbol: &S) -> u8 {
    match symbol.flags() {
        SymbolFlags::Elf { st_info, .. } => st_info,
        _ => 0,
    }
}
