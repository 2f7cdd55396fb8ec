use perfkit_template::TemplateError;
use std::path::PathBuf;

/// Errors raised while driving external tools.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Failed to start `{program}`: {source}")]
    Spawn { program: String, source: std::io::Error },

    #[error("Command `{command}` {}", describe_exit(*code))]
    Failed { command: String, code: Option<i32> },

    #[error("Invalid file pattern {pattern:?}: {source}")]
    Pattern { pattern: String, source: regex::Error },

    #[error("No file matching `{pattern}` in {}", dir.display())]
    NoMatch { dir: PathBuf, pattern: String },

    #[error("Failed to scan {}: {source}", dir.display())]
    Scan { dir: PathBuf, source: walkdir::Error },

    #[error("Failed to prepare {what}: {source}")]
    Io { what: &'static str, source: std::io::Error },

    #[error("File operation failed: {source}")]
    Files {
        #[from]
        source: TemplateError,
    },
}

impl ToolError {
    /// Exit code of a failed external command, if it exited normally.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || "was terminated by a signal".to_owned(),
        |code| format!("exited with code {code}"),
    )
}
