//! Error types for aloe-support
//!
//! All modules use `AloeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for aloe-support operations
pub type AloeResult<T> = Result<T, AloeError>;

/// All errors that can occur in the support tools
#[derive(Error, Debug)]
pub enum AloeError {
    // Argument errors
    #[error("Invalid address '{input}': expected a hexadecimal number")]
    InvalidAddress { input: String },

    // External tool errors
    #[error("Required tool not found: {program}")]
    ToolNotFound { program: String },

    #[error("Failed to start command: {command}")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}, exit code: {code}")]
    ToolFailed { command: String, code: i32 },

    #[error("Command terminated by signal {signal}: {command}")]
    ToolSignaled { command: String, signal: i32 },

    // Chariot errors
    #[error("chariot returned no output directory for recipe {0}")]
    RecipePathEmpty(String),

    #[error("Invalid recipe identifier: '{0}'")]
    RecipeInvalid(String),

    // Initrd errors
    #[error("Staging directory already exists: {0}")]
    StagingExists(PathBuf),

    #[error("Failed to write archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Editor errors
    #[error("Cannot determine project root from executable location")]
    ProjectRootUnknown,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl AloeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Map a spawn failure, distinguishing a missing program
    pub fn spawn_failed(program: &str, command: impl Into<String>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::ToolNotFound {
                program: program.to_string(),
            }
        } else {
            Self::ToolSpawn {
                command: command.into(),
                source,
            }
        }
    }

    /// Create a tool failure error
    pub fn tool_failed(command: impl Into<String>, code: i32) -> Self {
        Self::ToolFailed {
            command: command.into(),
            code,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ToolNotFound { program } => Some(format!(
                "Install {program} or point the matching `program` key in the config at it"
            )),
            Self::StagingExists(path) => {
                Some(format!("Remove {} or rerun with --force", path.display()))
            }
            Self::ProjectRootUnknown => {
                Some("Pass --project-root or set editor.project_root".to_string())
            }
            Self::RecipePathEmpty(_) => {
                Some("Check the chariot cache path in the config".to_string())
            }
            _ => None,
        }
    }
}
