//! Subprocess execution
//!
//! Every external tool goes through [`CommandRunner::run`] or
//! [`CommandRunner::capture`]. A nonzero exit is reported as an [`Outcome`],
//! never as an error: the call site decides whether it is fatal through
//! [`Outcome::check`], relays it through [`Outcome::exit_code`], or ignores it.

mod system;

#[cfg(test)]
pub(crate) mod fake;

pub use system::SystemRunner;

use crate::error::{AloeError, AloeResult};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// SIGINT, reported by a child killed from the terminal
pub const SIGINT: i32 = 2;

/// What happens to the child's standard output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdoutMode {
    /// Share the caller's stdout
    #[default]
    Inherit,
    /// Discard it
    Null,
}

/// A fully assembled external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub stdout: StdoutMode,
    /// Treat Ctrl-C while the child runs as a normal way to end it
    pub interruptible: bool,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            stdout: StdoutMode::Inherit,
            interruptible: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn stdout(mut self, mode: StdoutMode) -> Self {
        self.stdout = mode;
        self
    }

    pub fn interruptible(mut self) -> Self {
        self.interruptible = true;
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Exited(i32),
    Signaled(i32),
    /// The user pressed Ctrl-C while an interruptible child ran
    Interrupted,
}

impl Outcome {
    pub fn success(&self) -> bool {
        matches!(self, Outcome::Exited(0))
    }

    /// Exit status to relay from this process, shell style
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Exited(code) => *code,
            Outcome::Signaled(signal) => 128 + signal,
            Outcome::Interrupted => 128 + SIGINT,
        }
    }

    /// Turn anything but a clean exit into an error
    pub fn check(self, command: &ToolCommand) -> AloeResult<()> {
        match self {
            Outcome::Exited(0) => Ok(()),
            Outcome::Exited(code) => Err(AloeError::tool_failed(command.to_string(), code)),
            Outcome::Signaled(signal) => Err(AloeError::ToolSignaled {
                command: command.to_string(),
                signal,
            }),
            Outcome::Interrupted => Err(AloeError::ToolSignaled {
                command: command.to_string(),
                signal: SIGINT,
            }),
        }
    }
}

/// Executes external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion with inherited stdio (or discarded stdout)
    async fn run(&self, command: &ToolCommand) -> AloeResult<Outcome>;

    /// Run to completion, returning captured stdout; stderr stays inherited
    async fn capture(&self, command: &ToolCommand) -> AloeResult<(Outcome, String)>;
}
