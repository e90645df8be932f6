//! # addrline - Address to Source Line Resolution
//!
//! addrline resolves addresses inside ELF executables and shared objects to
//! the function, source file and line they belong to, using the binary's
//! symbol table and DWARF debug information. It also reports whether an
//! address lies in an inlined function body, attributing such addresses to
//! the call site.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   load once   ┌──────────────────────────────┐
//! │ ModuleCache  │──────────────▶│         LoadedModule         │
//! │ (per path)   │               │ SymbolIndex + DwarfDebugInfo │
//! └──────────────┘               └──────────────┬───────────────┘
//!                                               │ query(address)
//!                                               ▼
//!          ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!          │ Floor search │──▶│ Inline walk  │──▶│  Line table  │
//!          │ + demangle   │   │ (DIE tree)   │   │  heuristic   │
//!          └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                       │
//!                                                       ▼
//!                                                   ResolvedLocation
//! ```
//!
//! ## Module Structure
//!
//! - [`symbolization`]: symbol index, debug information access, inline
//!   detection, line resolution, loaded modules and the module cache
//! - [`domain`]: result types and errors
//! - [`cli`]: command-line argument parsing for the `addrline` binary
//!
//! ## Typical Usage
//!
//! ```bash
//! # Resolve two addresses, demangling function names
//! addrline -C ./libfoo.so 0x493c 0x4a10
//!
//! # Resolve the entry point of a symbol
//! addrline ./libfoo.so --symbol my_function
//!
//! # Addresses from stdin, JSON output
//! cat addrs.txt | addrline --json ./libfoo.so
//! ```

pub mod cli;
pub mod domain;
pub mod symbolization;
