//! Configuration schema for aloe-support
//!
//! Configuration is stored at `~/.config/aloe-support/config.toml`, with an
//! optional project-local `.aloe-support.toml` layered on top.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build/cache tool settings
    pub chariot: ChariotConfig,

    /// Symbol resolver settings
    pub symbols: SymbolsConfig,

    /// Editor session settings
    pub editor: EditorConfig,

    /// Initrd packager settings
    pub initrd: InitrdConfig,

    /// Emulator settings
    pub qemu: QemuConfig,

    /// Terminal emulator font control
    pub terminal: TerminalConfig,
}

/// Chariot build/cache tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChariotConfig {
    /// Chariot executable
    pub program: String,

    /// Cache directory passed through `--cache`
    pub cache_path: PathBuf,
}

impl Default for ChariotConfig {
    fn default() -> Self {
        Self {
            program: "chariot".to_string(),
            cache_path: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("aloe-chariot-cache"),
        }
    }
}

/// Symbol resolver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolsConfig {
    /// Address-to-line executable
    pub program: String,

    /// Recipe whose output holds the kernel image
    pub recipe: String,

    /// Kernel ELF path relative to the recipe output
    pub elf_path: PathBuf,
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            program: "addr2line".to_string(),
            recipe: "package/aloe".to_string(),
            elf_path: PathBuf::from("usr/bin/aloe.elf"),
        }
    }
}

/// Editor session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Chariot config file, relative to the project root
    pub config_file: PathBuf,

    /// Project root (defaults to the parent of the executable's directory)
    pub project_root: Option<PathBuf>,

    /// Cache path override for editor sessions
    pub cache_path: Option<PathBuf>,

    /// Package providing the indexing daemon inside the sandbox
    pub package: String,

    /// HOME inside the sandbox
    pub home: String,

    /// XDG_CACHE_HOME inside the sandbox
    pub cache_home: String,

    /// Mount point for recipe sources inside the sandbox
    pub sources_root: String,

    /// Variable naming the sources directory in path mappings
    pub sources_var: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("config.chariot"),
            project_root: None,
            cache_path: None,
            package: "clangd".to_string(),
            home: "/root/clangd".to_string(),
            cache_home: "/root/clangd/cache".to_string(),
            sources_root: "/chariot/sources".to_string(),
            sources_var: "$SOURCES_DIR".to_string(),
        }
    }
}

/// Initrd packager settings. Paths are relative to the working root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InitrdConfig {
    /// Build command run inside `init_dir`
    pub make_program: String,

    /// Directory holding the init program sources
    pub init_dir: PathBuf,

    /// Artifact produced inside `init_dir`
    pub init_artifact: PathBuf,

    /// Transient staging directory
    pub staging_dir: PathBuf,

    /// Output archive
    pub archive_path: PathBuf,
}

impl Default for InitrdConfig {
    fn default() -> Self {
        Self {
            make_program: "make".to_string(),
            init_dir: PathBuf::from("init"),
            init_artifact: PathBuf::from("init.elf"),
            staging_dir: PathBuf::from("build/initrd"),
            archive_path: PathBuf::from("build/aloe.initrd"),
        }
    }
}

/// Emulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QemuConfig {
    /// Emulator executable
    pub program: String,

    /// UEFI firmware image, mapped read-only as pflash
    pub firmware_path: PathBuf,

    /// Recipes brought up to date before each run
    pub recipes: Vec<String>,

    /// Recipe whose output holds the disk image
    pub image_recipe: String,

    /// Disk image file name inside the image recipe output
    pub image_file: String,

    /// Guest memory
    pub memory: String,

    /// Guest cores
    pub cores: u32,

    /// Interrupt log written by `-d int`
    pub log_file: PathBuf,
}

impl Default for QemuConfig {
    fn default() -> Self {
        Self {
            program: "qemu-system-x86_64".to_string(),
            firmware_path: PathBuf::from("/usr/share/ovmf/x64/OVMF.4m.fd"),
            recipes: vec!["source/aloe".to_string(), "custom/image".to_string()],
            image_recipe: "custom/image".to_string(),
            image_file: "aloe.img".to_string(),
            memory: "1G".to_string(),
            cores: 1,
            log_file: PathBuf::from("log.txt"),
        }
    }
}

/// Terminal emulator font control
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Change the font size around emulator runs
    pub enabled: bool,

    /// Terminal emulator executable accepting `msg config`
    pub program: String,

    /// Size restored after the run
    pub font_size_normal: u32,

    /// Size used while the emulator runs
    pub font_size_debug: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "alacritty".to_string(),
            font_size_normal: 13,
            font_size_debug: 10,
        }
    }
}

impl Config {
    /// Cache path used for editor sessions
    pub fn editor_cache_path(&self) -> &PathBuf {
        self.editor
            .cache_path
            .as_ref()
            .unwrap_or(&self.chariot.cache_path)
    }
}
