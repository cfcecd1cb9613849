//! Plumbing shared by the tool binaries: argument parsing, logging,
//! configuration loading and exit status reporting.

pub mod args;

pub use args::{Addr2lineCli, ClangdCli, CommonArgs, InitrdCli, QemuCli};

use crate::config::{Config, ConfigManager};
use crate::error::{AloeError, AloeResult};
use clap::error::ErrorKind;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parse arguments. Help and version behave as usual; any other argument
/// error prints `usage` to stdout. `Err` carries the exit status to use.
pub fn parse_args<T: Parser>(usage: &str) -> Result<T, ExitCode> {
    parse_args_from(std::env::args_os(), usage).map_err(ExitCode::from)
}

pub fn parse_args_from<T, I, S>(argv: I, usage: &str) -> Result<T, u8>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(argv) {
        Ok(cli) => Ok(cli),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                Err(0)
            }
            _ => {
                println!("{}", usage);
                Err(1)
            }
        },
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("aloe_support=warn"),
        1 => EnvFilter::new("aloe_support=info"),
        _ => EnvFilter::new("aloe_support=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Load the configuration selected by the common flags
pub async fn load_config(common: &CommonArgs) -> AloeResult<Config> {
    let manager = match common.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let local = if common.no_local {
        debug!("Local config discovery disabled (--no-local)");
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| AloeError::io("getting current directory", e))?;
        let found = ConfigManager::find_local_config(&cwd);
        if let Some(ref path) = found {
            debug!("Found local config: {}", path.display());
        }
        found
    };

    manager.load_merged(local.as_deref()).await
}

/// Map a child's exit status onto this process's exit status
pub fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

/// Print an error (and its hint) the way every tool does, or relay `code`
pub fn report(result: AloeResult<i32>) -> u8 {
    match result {
        Ok(code) => exit_status(code),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            1
        }
    }
}

pub fn finish(result: AloeResult<i32>) -> ExitCode {
    ExitCode::from(report(result))
}
