use addrline::domain::{ErrorKind, SymbolizeError};
use addrline::symbolization::{
    DebugEntry, DebugInfo, EntryTag, LineRow, LineTable, LoadedModule, RawSymbol, SymbolIndex,
};
use std::ops::{ControlFlow, Range};
use std::sync::Arc;

const STT_FUNC_GLOBAL: u8 = 0x12;

/// One compile unit covering `range`, described entirely in memory
struct StaticDebugInfo {
    range: Range<u64>,
    entries: Vec<DebugEntry>,
    lines: Arc<LineTable>,
}

impl DebugInfo for StaticDebugInfo {
    fn walk_unit(
        &self,
        pc: u64,
        visit: &mut dyn FnMut(&DebugEntry) -> ControlFlow<()>,
    ) -> Result<(), SymbolizeError> {
        if !self.range.contains(&pc) {
            return Err(SymbolizeError::SeekFailed { address: pc, reason: "no unit".into() });
        }
        for entry in &self.entries {
            if visit(entry).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn line_table(&self, pc: u64) -> Result<Arc<LineTable>, SymbolizeError> {
        if !self.range.contains(&pc) {
            return Err(SymbolizeError::SeekFailed { address: pc, reason: "no unit".into() });
        }
        Ok(Arc::clone(&self.lines))
    }
}

fn row(address: u64, file: &str, line: u32) -> LineRow {
    LineRow { address, file: Arc::from(file), line, end_sequence: false }
}

fn end(address: u64) -> LineRow {
    LineRow { address, file: Arc::from(""), line: 0, end_sequence: true }
}

fn foo_module() -> LoadedModule {
    let symbols = SymbolIndex::build([RawSymbol {
        name: "_Z3foov",
        address: 0x1000,
        info: STT_FUNC_GLOBAL,
    }]);
    let debug_info = StaticDebugInfo {
        range: 0x1000..0x1100,
        entries: vec![DebugEntry { tag: EntryTag::Subprogram, ranges: vec![0x1000..0x1100] }],
        lines: Arc::new(LineTable::new(vec![row(0x1000, "foo.c", 10), end(0x1100)])),
    };
    LoadedModule::from_parts("libfoo.so", symbols, debug_info)
}

#[test]
fn test_resolves_demangled_function_and_line() {
    let location = foo_module().query(0x1004, true).expect("0x1004 should resolve");

    assert_eq!(location.address, 0x1004);
    assert_eq!(location.module_path, "libfoo.so");
    assert_eq!(location.function_name, "foo()");
    assert_eq!(location.file, "foo.c");
    assert_eq!(location.line, 10);
    assert!(!location.is_inline);
}

#[test]
fn test_address_below_lowest_symbol_not_found() {
    let module = foo_module();
    for addr in [0, 0x10, 0x0fff] {
        let err = module.query(addr, true).err().expect("should not resolve");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

#[test]
fn test_inline_call_site_with_zero_line_uses_next_row() {
    let symbols = SymbolIndex::build([RawSymbol {
        name: "caller",
        address: 0x2000,
        info: STT_FUNC_GLOBAL,
    }]);
    let debug_info = StaticDebugInfo {
        range: 0x2000..0x2100,
        entries: vec![
            DebugEntry { tag: EntryTag::Subprogram, ranges: vec![0x2000..0x2100] },
            DebugEntry { tag: EntryTag::InlinedSubroutine, ranges: vec![0x2040..0x2060] },
        ],
        lines: Arc::new(LineTable::new(vec![
            row(0x2000, "caller.c", 40),
            row(0x2030, "caller.c", 0),
            row(0x2040, "callee.h", 7),
            row(0x2050, "caller.c", 42),
            end(0x2100),
        ])),
    };
    let module = LoadedModule::from_parts("libcaller.so", symbols, debug_info);

    let location = module.query(0x2044, true).expect("0x2044 should resolve");
    assert!(location.is_inline);
    assert_eq!(location.function_name, "caller");
    assert_eq!(location.line, 42);
    assert_eq!(location.file, "caller.c");
}

#[test]
fn test_find_by_symbol_name_keeps_raw_name() {
    let location = foo_module().find_by_symbol_name("_Z3foov").expect("symbol should resolve");
    assert_eq!(location.address, 0x1000);
    assert_eq!(location.function_name, "_Z3foov");
    assert_eq!(location.line, 10);

    let err = foo_module().find_by_symbol_name("foo").err().expect("raw names only");
    assert!(matches!(err, SymbolizeError::SymbolNotFound(name) if name == "foo"));
}
