use perfkit_template::TemplateError;
use perfkit_toolchain::ToolError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("No native source tree configured; run `perfkit setup` or set build.source_dir")]
    MissingSourceDir,

    #[error("No target architecture configured")]
    NoArchitectures,

    #[error("Artifact path {} has no usable file name", path.display())]
    FileName { path: PathBuf },

    #[error("Build step failed")]
    Tool {
        #[from]
        source: ToolError,
    },

    #[error("Deploy file operation failed")]
    Files {
        #[from]
        source: TemplateError,
    },
}
