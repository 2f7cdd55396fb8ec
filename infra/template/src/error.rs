use std::path::PathBuf;

/// Errors produced while rendering templates or touching generated files.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to {action} {}: {source}", path.display())]
    Io { action: &'static str, path: PathBuf, source: std::io::Error },

    #[error("Invalid placeholder key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Unbound placeholder `{name}` on line {line}")]
    Unbound { name: String, line: usize },

    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern { pattern: String, source: regex::Error },
}

impl TemplateError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { action, path, source }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
