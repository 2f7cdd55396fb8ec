use crate::error::ToolError;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// An external invocation: program and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self { program: program.as_ref().to_owned(), args: Vec::new() }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Value that follows `flag` in the argument list.
    #[must_use]
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(OsString::as_os_str)
    }

    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain { word.to_owned() } else { format!("'{}'", word.replace('\'', r"'\''")) }
}

/// Seam between the procedures and the processes they spawn.
pub trait CommandRunner {
    /// Runs the command with inherited stdio and waits for it.
    ///
    /// # Errors
    /// Returns [`ToolError::Spawn`] if the program cannot be started and
    /// [`ToolError::Failed`] if it exits unsuccessfully.
    fn run(&self, command: &CommandSpec) -> Result<(), ToolError>;

    /// Runs the command and captures its standard output.
    ///
    /// # Errors
    /// Same as [`CommandRunner::run`].
    fn output(&self, command: &CommandSpec) -> Result<String, ToolError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &CommandSpec) -> Result<(), ToolError> {
        (**self).run(command)
    }

    fn output(&self, command: &CommandSpec) -> Result<String, ToolError> {
        (**self).output(command)
    }
}

/// Spawns real processes through [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<(), ToolError> {
        info!(command = %command, "Running");
        let status = command.to_command().status().map_err(|source| spawn_error(command, source))?;
        check_status(command, status)
    }

    fn output(&self, command: &CommandSpec) -> Result<String, ToolError> {
        debug!(command = %command, "Capturing output");
        let mut cmd = command.to_command();
        cmd.stdin(Stdio::null()).stderr(Stdio::inherit());
        let out = cmd.output().map_err(|source| spawn_error(command, source))?;
        check_status(command, out.status)?;
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

fn spawn_error(command: &CommandSpec, source: std::io::Error) -> ToolError {
    ToolError::Spawn { program: command.program().to_string_lossy().into_owned(), source }
}

fn check_status(command: &CommandSpec, status: ExitStatus) -> Result<(), ToolError> {
    if status.success() {
        Ok(())
    } else {
        Err(ToolError::Failed { command: command.to_string(), code: status.code() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_words_with_spaces() {
        let cmd = CommandSpec::new("openssl")
            .args(["req", "-subj", "/C=CN/O=Acme, Inc./CN=bench"])
            .arg("-new");
        assert_eq!(cmd.to_string(), "openssl req -subj '/C=CN/O=Acme, Inc./CN=bench' -new");
    }

    #[test]
    fn flag_value_returns_following_argument() {
        let cmd = CommandSpec::new("autoninja").args(["-C", "out/arm64", "cronet_package"]);
        assert_eq!(cmd.flag_value("-C"), Some(OsStr::new("out/arm64")));
        assert_eq!(cmd.flag_value("-j"), None);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = SystemRunner
            .run(&CommandSpec::new("perfkit-definitely-not-a-real-program"))
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_keeps_the_code() {
        let err = SystemRunner.run(&CommandSpec::new("sh").args(["-c", "exit 3"])).unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert!(err.to_string().contains("exited with code 3"));
    }

    #[cfg(unix)]
    #[test]
    fn output_captures_stdout() {
        let out = SystemRunner.output(&CommandSpec::new("echo").arg("bench-01")).unwrap();
        assert_eq!(out.trim(), "bench-01");
    }
}
