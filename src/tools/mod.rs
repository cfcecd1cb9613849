//! The four support tools
//!
//! - [`symbols`] - kernel address lookup through addr2line
//! - [`editor`] - clangd inside the chariot sandbox
//! - [`initrd`] - init program build and USTAR ramdisk packaging
//! - [`vm`] - paused QEMU debugging runs, with [`terminal`] font control

pub mod editor;
pub mod initrd;
pub mod symbols;
pub mod terminal;
pub mod vm;
