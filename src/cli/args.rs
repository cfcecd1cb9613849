//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

/// Options shared by every tool
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "ALOE_SUPPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .aloe-support.toml discovery
    #[arg(long)]
    pub no_local: bool,
}

/// Resolve kernel addresses to function, file and line
#[derive(Parser, Debug)]
#[command(name = "aloe-addr2line")]
#[command(version, about, long_about = None)]
pub struct Addr2lineCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Hexadecimal address, with or without 0x
    #[arg(required = true, value_name = "ADDRESS")]
    pub addresses: Vec<String>,
}

impl Addr2lineCli {
    pub const USAGE: &'static str = "Usage: aloe-addr2line <address>...";
}

/// Run clangd inside a recipe's chariot build environment
#[derive(Parser, Debug)]
#[command(name = "aloe-clangd")]
#[command(version, about, long_about = None)]
pub struct ClangdCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Recipe whose build environment hosts clangd
    pub package: String,

    /// Source name the recipe uses for the current directory
    pub source: String,

    /// Project root holding config.chariot
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Anything after the source name is ignored
    #[arg(hide = true, trailing_var_arg = true)]
    pub ignored: Vec<String>,
}

impl ClangdCli {
    pub const USAGE: &'static str = "Usage: aloe-clangd <package> <source name>";
}

/// Build the init program and package it into build/aloe.initrd
#[derive(Parser, Debug)]
#[command(name = "aloe-initrd")]
#[command(version, about, long_about = None)]
pub struct InitrdCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory holding init/ and build/ (defaults to current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Remove a leftover staging directory instead of failing
    #[arg(short, long)]
    pub force: bool,
}

impl InitrdCli {
    pub const USAGE: &'static str = "Usage: aloe-initrd [--root <dir>] [--force]";
}

/// Build the kernel image and boot it paused in QEMU with the gdb stub open
#[derive(Parser, Debug)]
#[command(name = "aloe-qemu")]
#[command(version, about, long_about = None)]
pub struct QemuCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Leave the terminal font size alone
    #[arg(long)]
    pub no_font: bool,

    /// Print the QEMU command line instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

impl QemuCli {
    pub const USAGE: &'static str = "Usage: aloe-qemu [--no-font] [--dry-run]";
}
