//! Command runner backed by real child processes

use super::{CommandRunner, Outcome, StdoutMode, ToolCommand, SIGINT};
use crate::error::{AloeError, AloeResult};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// How long an interrupted child gets to exit on its own before being killed
const INTERRUPT_GRACE: Duration = Duration::from_secs(5);

/// Runs commands with `tokio::process`
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn prepare(command: &ToolCommand) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &command.env {
            cmd.env(key, value);
        }
        cmd
    }

    fn outcome(status: ExitStatus, interruptible: bool) -> Outcome {
        if let Some(code) = status.code() {
            return Outcome::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                if interruptible && signal == SIGINT {
                    return Outcome::Interrupted;
                }
                return Outcome::Signaled(signal);
            }
        }

        #[cfg(not(unix))]
        let _ = interruptible;
        Outcome::Exited(-1)
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> AloeResult<Outcome> {
        debug!("Executing: {}", command);

        let mut cmd = Self::prepare(command);
        cmd.stdin(Stdio::inherit()).stderr(Stdio::inherit());
        cmd.stdout(match command.stdout {
            StdoutMode::Inherit => Stdio::inherit(),
            StdoutMode::Null => Stdio::null(),
        });

        let mut child = cmd
            .spawn()
            .map_err(|e| AloeError::spawn_failed(&command.program, command.to_string(), e))?;

        let waited = if command.interruptible {
            tokio::select! {
                status = child.wait() => status,
                Ok(()) = tokio::signal::ctrl_c() => {
                    info!("Interrupted, waiting for {} to exit", command.program);
                    // The child shares our process group and got the same SIGINT.
                    if tokio::time::timeout(INTERRUPT_GRACE, child.wait()).await.is_err() {
                        warn!("{} ignored the interrupt, killing it", command.program);
                        child
                            .kill()
                            .await
                            .map_err(|e| AloeError::io(format!("killing {}", command.program), e))?;
                    }
                    return Ok(Outcome::Interrupted);
                }
            }
        } else {
            child.wait().await
        };

        let status =
            waited.map_err(|e| AloeError::io(format!("waiting for {}", command.program), e))?;
        let outcome = Self::outcome(status, command.interruptible);
        debug!("{} finished: {:?}", command.program, outcome);
        Ok(outcome)
    }

    async fn capture(&self, command: &ToolCommand) -> AloeResult<(Outcome, String)> {
        debug!("Executing (captured): {}", command);

        let output = Self::prepare(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| AloeError::spawn_failed(&command.program, command.to_string(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        Ok((Self::outcome(output.status, false), stdout))
    }
}
