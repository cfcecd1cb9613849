//! aloe-support - developer tools for the Aloe kernel
//!
//! Thin orchestration over external tools: chariot resolves and builds
//! recipes, everything else is addr2line, clangd, make or QEMU.

pub mod chariot;
pub mod cli;
pub mod config;
pub mod error;
pub mod process;
pub mod tools;

pub use error::{AloeError, AloeResult};
