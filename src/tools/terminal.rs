//! Terminal emulator font control over its IPC socket

use crate::config::schema::TerminalConfig;
use crate::process::{CommandRunner, ToolCommand};
use tracing::{debug, warn};

/// `<terminal> msg config font.size=<size>`
pub fn font_size_command(program: &str, size: u32) -> ToolCommand {
    ToolCommand::new(program)
        .args(["msg", "config"])
        .arg(format!("font.size={}", size))
}

/// Changes the controlling terminal's font size. Failures are logged and
/// otherwise ignored: a missing terminal must not stop a debugging run.
pub struct FontControl<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a TerminalConfig,
    enabled: bool,
}

impl<'a> FontControl<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a TerminalConfig) -> Self {
        Self {
            runner,
            config,
            enabled: config.enabled,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub async fn debugging(&self) {
        self.set(self.config.font_size_debug).await;
    }

    pub async fn restore(&self) {
        self.set(self.config.font_size_normal).await;
    }

    async fn set(&self, size: u32) {
        if !self.enabled {
            return;
        }

        let cmd = font_size_command(&self.config.program, size);
        match self.runner.run(&cmd).await {
            Ok(outcome) if outcome.success() => debug!("Font size set to {}", size),
            Ok(outcome) => warn!("{} exited with {:?}", cmd, outcome),
            Err(e) => warn!("Could not set font size: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeRunner;
    use crate::process::Outcome;

    #[test]
    fn command_shape() {
        let cmd = font_size_command("alacritty", 10);
        assert_eq!(cmd.to_string(), "alacritty msg config font.size=10");
    }

    #[tokio::test]
    async fn failures_are_ignored() {
        let runner = FakeRunner::new().script("alacritty", Outcome::Exited(1), "");
        let config = TerminalConfig::default();
        let font = FontControl::new(&runner, &config);

        font.debugging().await;
        font.restore().await;

        let calls = runner.calls();
        assert_eq!(calls[0].args[2], "font.size=10");
        assert_eq!(calls[1].args[2], "font.size=13");
    }

    #[tokio::test]
    async fn disabled_runs_nothing() {
        let runner = FakeRunner::new();
        let config = TerminalConfig::default();
        let font = FontControl::new(&runner, &config).disabled();

        font.debugging().await;
        font.restore().await;
        assert!(runner.calls().is_empty());
    }
}
