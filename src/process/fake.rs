//! In-memory command runner for unit tests

use super::{CommandRunner, Outcome, ToolCommand};
use crate::error::AloeResult;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Records every command and replays scripted outcomes per program.
/// Unscripted commands exit 0 with empty stdout.
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<ToolCommand>>,
    scripted: Mutex<HashMap<String, VecDeque<(Outcome, String)>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next call to `program`
    pub fn script(self, program: &str, outcome: Outcome, stdout: &str) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push_back((outcome, stdout.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }

    fn next(&self, command: &ToolCommand) -> (Outcome, String) {
        self.calls.lock().unwrap().push(command.clone());
        self.scripted
            .lock()
            .unwrap()
            .get_mut(&command.program)
            .and_then(VecDeque::pop_front)
            .unwrap_or((Outcome::Exited(0), String::new()))
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, command: &ToolCommand) -> AloeResult<Outcome> {
        Ok(self.next(command).0)
    }

    async fn capture(&self, command: &ToolCommand) -> AloeResult<(Outcome, String)> {
        Ok(self.next(command))
    }
}
