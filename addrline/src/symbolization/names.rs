//! Display names for raw symbol names
//!
//! Rust symbols (legacy `_ZN...17h<hash>E` and v0 `_R...`) go through
//! `rustc_demangle` and are rendered without the hash. Everything else that
//! looks like an Itanium C++ name goes through `cpp_demangle`. Names neither
//! demangler accepts are returned as-is, which is the normal case for C and
//! static symbols.

use cpp_demangle::DemangleOptions;
use rustc_demangle::try_demangle;

/// Prefix the Android dynamic linker puts in front of its mangled names
const DYNAMIC_LOADER_PREFIX: &str = "__dl__Z";

/// Length of the part of [`DYNAMIC_LOADER_PREFIX`] that is not mangling
const DYNAMIC_LOADER_PREFIX_STRIP: usize = 5;

/// Map a raw symbol name to the name shown to the user
#[must_use]
pub fn resolve_name(raw_name: &str, demangle: bool) -> String {
    if !demangle {
        return raw_name.to_string();
    }

    let mangled = if raw_name.starts_with(DYNAMIC_LOADER_PREFIX) {
        &raw_name[DYNAMIC_LOADER_PREFIX_STRIP..]
    } else {
        raw_name
    };

    demangle_symbol(mangled).unwrap_or_else(|| raw_name.to_string())
}

/// Demangle a Rust or C++ symbol, `None` if it is not a mangled name
#[must_use]
pub fn demangle_symbol(symbol: &str) -> Option<String> {
    if let Ok(demangled) = try_demangle(symbol) {
        return Some(format!("{demangled:#}"));
    }

    cpp_demangle::Symbol::new(symbol)
        .ok()
        .and_then(|sym| sym.demangle(&DemangleOptions::default()).ok())
}
