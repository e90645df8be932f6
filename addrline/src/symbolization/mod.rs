//! # Address Resolution
//!
//! This module turns a raw address inside an executable or shared object
//! into the function, source file and line it belongs to, and tells whether
//! the address lies inside an inlined function body.
//!
//! ## The Resolution Problem
//!
//! A crash report or profiler sample carries addresses like `0x1004`. To
//! make sense of them we need:
//! - **Function name**: `foo()` (demangled from `_Z3foov`)
//! - **File path**: `/home/user/project/foo.c`
//! - **Line number**: `10`
//! - **Inline status**: whether `0x1004` is code the compiler copied in
//!   from another function
//!
//! ## Key Concepts
//!
//! ### Symbol Table
//!
//! Every non-stripped ELF binary lists its functions and variables with
//! their start addresses. An address usually falls somewhere inside a
//! function body, so the enclosing symbol is the one with the greatest start
//! address that is still less than or equal to the address (a floor search).
//!
//! ### DWARF Debug Information
//!
//! **DWARF** carries two structures used here:
//! - The **debug information entry tree**: compile units containing
//!   subprograms, which contain inlined subroutines, each with address ranges
//! - The **line-number program**: a table mapping instruction addresses to
//!   file/line pairs
//!
//! **Libraries used**:
//! - `object`: ELF parser (symbol table, section data)
//! - `gimli`: Low-level DWARF parser
//! - `rustc-demangle` / `cpp_demangle`: symbol demangling
//!
//! ### Inlined Code
//!
//! When the compiler inlines `bar()` into `foo()`, the line table rows inside
//! the copied body point at `bar()`'s source, and the row at the expansion
//! boundary often has line 0. For such addresses we report the call site in
//! `foo()` instead (see [`lines`]).
//!
//! ## Resolution Flow
//!
//! ```text
//! 1. Load the module once
//!    symbol table -> SymbolIndex (sorted by address)
//!    .debug_info / .debug_line -> DwarfDebugInfo
//!
//! 2. Floor search the index
//!    0x1004 -> _Z3foov @ 0x1000
//!
//! 3. Display name
//!    _Z3foov -> foo()
//!
//! 4. Walk the compile unit covering 0x1004
//!    inlined subroutine with a single range containing 0x1004? -> inline
//!
//! 5. Line table
//!    row covering 0x1004 -> foo.c:10
//!    (inline: previous row, or next row if the previous has line 0)
//! ```
//!
//! ## Module Structure
//!
//! - **`symbol_index`**: symbol table filtering and floor lookup
//! - **`names`**: demangling, including the dynamic loader `__dl__` prefix
//! - **`debug_info`**: the [`DebugInfo`] seam and the line table model
//! - **`dwarf`**: gimli-backed [`DebugInfo`]
//! - **`inline`**: inline detection
//! - **`lines`**: source line resolution
//! - **`module`**: [`LoadedModule`], the query entry points
//! - **`cache`**: [`ModuleCache`], per-path loading shared between threads
//!
//! ## Example
//!
//! ```rust,no_run
//! use addrline::symbolization::ModuleCache;
//!
//! let cache = ModuleCache::new();
//! let module = cache.get_or_load("/usr/lib/libfoo.so")?;
//! let location = module.query(0x493c, true)?;
//! println!("{location}");
//! # Ok::<(), addrline::domain::SymbolizeError>(())
//! ```
//!
//! ## Limitations
//!
//! - **Requires debug info**: binaries without `.debug_info` and
//!   `.debug_line` fail to load
//! - **ELF only**: other object formats are not parsed
//! - **Split inline ranges**: inlined subroutines covering several
//!   disjoint ranges are not reported as inline

pub mod cache;
pub mod debug_info;
pub mod dwarf;
pub mod inline;
pub mod lines;
pub mod module;
pub mod names;
pub mod symbol_index;

pub use cache::ModuleCache;
pub use debug_info::{DebugEntry, DebugInfo, EntryTag, LineRow, LineTable};
pub use dwarf::DwarfDebugInfo;
pub use inline::detect_inline;
pub use lines::resolve_line;
pub use module::LoadedModule;
pub use names::{demangle_symbol, resolve_name};
pub use symbol_index::{RawSymbol, SymbolEntry, SymbolIndex};
