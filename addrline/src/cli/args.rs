//! CLI argument definitions

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "addrline",
    about = "Resolve addresses in a binary to function, file and line",
    after_help = "\
EXAMPLES:
    addrline ./libfoo.so 0x493c              Resolve one address
    addrline -C ./app 493c 4a10              Demangle function names
    addrline ./app --symbol main             Resolve a symbol's entry point
    nm ./app | cut -d' ' -f1 | addrline ./app   Read addresses from stdin"
)]
pub struct Args {
    /// Executable or shared object to resolve addresses in
    #[arg(value_name = "BINARY")]
    pub binary: PathBuf,

    /// Hexadecimal addresses (read from stdin if none are given)
    #[arg(value_name = "ADDRESS", value_parser = parse_address)]
    pub addresses: Vec<u64>,

    /// Demangle function names
    #[arg(short = 'C', long)]
    pub demangle: bool,

    /// Resolve the address of a symbol by its raw name
    #[arg(short, long, value_name = "NAME", conflicts_with = "addresses")]
    pub symbol: Option<String>,

    /// Print one JSON object per address
    #[arg(long)]
    pub json: bool,

    /// Do not report unresolved addresses on stderr (the exit status still does)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse a hexadecimal address, with or without a `0x` prefix
///
/// # Errors
/// Returns an error if the text is not a valid 64-bit hexadecimal number
pub fn parse_address(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).with_context(|| format!("Invalid address: {text}"))
}
