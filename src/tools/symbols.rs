//! Kernel address to source location lookup

use crate::chariot::{PathResolver, RecipeId};
use crate::config::schema::SymbolsConfig;
use crate::error::{AloeError, AloeResult};
use crate::process::{CommandRunner, ToolCommand};
use std::path::Path;
use tracing::debug;

/// Parse a hexadecimal address: optional `+` sign, optional `0x` prefix,
/// single underscores allowed between digits
pub fn parse_address(input: &str) -> AloeResult<u64> {
    let invalid = || AloeError::InvalidAddress {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        // A prefix may be followed by one separator, as in `0x_ff`.
        Some(rest) => rest.strip_prefix('_').unwrap_or(rest),
        None => unsigned,
    };

    let malformed = digits.is_empty()
        || !digits.starts_with(|c: char| c.is_ascii_hexdigit())
        || digits.ends_with('_')
        || digits.contains("__");
    if malformed {
        return Err(invalid());
    }

    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    u64::from_str_radix(&cleaned, 16).map_err(|_| invalid())
}

/// Lowercase `0x`-prefixed hex literal
pub fn format_address(address: u64) -> String {
    format!("{:#x}", address)
}

/// `addr2line -fai -e <elf> <address>...`
pub fn addr2line_command(program: &str, elf: &Path, addresses: &[u64]) -> ToolCommand {
    ToolCommand::new(program)
        .arg("-fai")
        .arg("-e")
        .arg(elf.to_string_lossy())
        .args(addresses.iter().map(|a| format_address(*a)))
}

/// Look up `addresses` in the kernel image and return addr2line's exit code
pub async fn resolve_symbols(
    runner: &dyn CommandRunner,
    resolver: &dyn PathResolver,
    config: &SymbolsConfig,
    addresses: &[u64],
) -> AloeResult<i32> {
    let recipe: RecipeId = config.recipe.parse()?;
    let elf = resolver.resolve(&recipe).await?.join(&config.elf_path);
    debug!("Kernel image: {}", elf.display());

    let cmd = addr2line_command(&config.program, &elf, addresses);
    let outcome = runner.run(&cmd).await?;
    Ok(outcome.exit_code())
}
