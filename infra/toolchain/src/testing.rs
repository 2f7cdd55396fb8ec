//! In-memory [`CommandRunner`] for tests of code that spawns external tools.

use crate::command::{CommandRunner, CommandSpec};
use crate::error::ToolError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

type Hook = Box<dyn Fn(&CommandSpec) -> Result<(), ToolError>>;

/// Records every command instead of spawning it.
///
/// * [`RecordingRunner::with_output`] sets the stdout returned for a program.
/// * [`RecordingRunner::fail_when`] makes matching commands fail with an exit code.
/// * [`RecordingRunner::with_hook`] runs a closure per command, e.g. to create
///   the files a real tool would produce.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<CommandSpec>>,
    outputs: HashMap<String, String>,
    failures: Vec<(String, i32)>,
    hook: Option<Hook>,
}

impl fmt::Debug for RecordingRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingRunner")
            .field("calls", &self.calls.borrow().len())
            .field("outputs", &self.outputs)
            .field("failures", &self.failures)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl RecordingRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output(mut self, program: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.outputs.insert(program.into(), stdout.into());
        self
    }

    /// Fails every command whose rendered line contains `needle`.
    #[must_use]
    pub fn fail_when(mut self, needle: impl Into<String>, code: i32) -> Self {
        self.failures.push((needle.into(), code));
        self
    }

    #[must_use]
    pub fn with_hook(
        mut self,
        hook: impl Fn(&CommandSpec) -> Result<(), ToolError> + 'static,
    ) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    fn record(&self, command: &CommandSpec) -> Result<(), ToolError> {
        self.calls.borrow_mut().push(command.clone());

        let line = command.to_string();
        if let Some((_, code)) = self.failures.iter().find(|(needle, _)| line.contains(needle)) {
            return Err(ToolError::Failed { command: line, code: Some(*code) });
        }
        self.hook.as_ref().map_or(Ok(()), |hook| hook(command))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> Result<(), ToolError> {
        self.record(command)
    }

    fn output(&self, command: &CommandSpec) -> Result<String, ToolError> {
        self.record(command)?;
        let program = command.program().to_string_lossy();
        Ok(self.outputs.get(program.as_ref()).cloned().unwrap_or_default())
    }
}
