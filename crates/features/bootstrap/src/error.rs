use perfkit_kernel::config::ConfigError;
use perfkit_template::TemplateError;
use perfkit_toolchain::ToolError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Cannot resolve path {}: {source}", path.display())]
    Path { path: PathBuf, source: std::io::Error },

    #[error("Host name is empty")]
    EmptyHostname,

    #[error("Server instance {index} has no valid port")]
    Ports { index: u16 },

    #[error("External tool step failed")]
    Tool {
        #[from]
        source: ToolError,
    },

    #[error("File generation failed")]
    Files {
        #[from]
        source: TemplateError,
    },

    #[error("Failed to record the native source tree")]
    Config {
        #[from]
        source: ConfigError,
    },
}
