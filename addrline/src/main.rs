//! # addrline - Main Entry Point
//!
//! Loads the binary once, then resolves every address given on the command
//! line (or on stdin, one per line) and prints one result per address.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::{self, BufRead, BufWriter, Write};

use addrline::cli::{parse_address, Args};
use addrline::domain::{ResolvedLocation, SymbolizeError};
use addrline::symbolization::LoadedModule;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    std::process::exit(match run(&args) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_ERROR,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

/// Resolve everything requested by `args`
///
/// Returns `Ok(false)` if at least one address could not be resolved.
fn run(args: &Args) -> Result<bool> {
    let module = LoadedModule::load(&args.binary)
        .with_context(|| format!("Cannot load {}", args.binary.display()))?;
    info!("{} symbols indexed in {}", module.symbols().len(), module.path());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if let Some(ref name) = args.symbol {
        let resolved = module.find_by_symbol_name(name);
        let ok = report(&mut out, name, resolved, args)?;
        out.flush()?;
        return Ok(ok);
    }

    let mut all_ok = true;
    if args.addresses.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read addresses from stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_address(&line) {
                Ok(addr) => {
                    let resolved = module.query(addr, args.demangle);
                    all_ok &= report(&mut out, &line, resolved, args)?;
                }
                Err(e) => {
                    if !args.quiet {
                        eprintln!("error: {e}");
                    }
                    all_ok = false;
                }
            }
        }
    } else {
        for &addr in &args.addresses {
            let label = format!("0x{addr:x}");
            all_ok &= report(&mut out, &label, module.query(addr, args.demangle), args)?;
        }
    }

    out.flush()?;
    Ok(all_ok)
}

/// Print one query outcome; failures go to stderr unless `--quiet`
fn report<W: Write>(
    out: &mut W,
    label: &str,
    resolved: Result<ResolvedLocation, SymbolizeError>,
    args: &Args,
) -> Result<bool> {
    match resolved {
        Ok(location) if args.json => {
            serde_json::to_writer(&mut *out, &location)?;
            writeln!(out)?;
            Ok(true)
        }
        Ok(location) => {
            writeln!(out, "{location}")?;
            Ok(true)
        }
        Err(e) => {
            if !args.quiet {
                eprintln!("error: {}: {e}", label.trim());
            }
            Ok(false)
        }
    }
}
