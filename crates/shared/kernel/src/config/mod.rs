mod local;
mod validate;

pub use local::persist_source_dir;
pub use validate::validate;

use config::{Config, Environment, File};
use perfkit_domain::config::HarnessConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Project configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "perfkit.toml";
/// Machine-local overrides written by `perfkit setup`.
pub const LOCAL_CONFIG_FILE: &str = "perfkit.local.toml";
/// Prefix of environment overrides (`PERFKIT__SERVERS__COUNT=2`).
pub const ENV_PREFIX: &str = "PERFKIT";

/// Errors raised while loading, validating or persisting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error ({context}): {source}")]
    Config { source: config::ConfigError, context: &'static str },

    #[error("Invalid configuration value for `{field}`: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Malformed TOML in {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("Failed to encode local configuration: {source}")]
    Encode {
        #[from]
        source: toml::ser::Error,
    },
}

/// Layered configuration loader.
///
/// Sources, later ones overriding earlier ones:
/// 1. built-in defaults of [`HarnessConfig`],
/// 2. `perfkit.toml` in the base directory (optional),
/// 3. `perfkit.local.toml` in the base directory (optional),
/// 4. an explicit file given with [`ConfigLoader::file`] (required),
/// 5. `PERFKIT__`-prefixed environment variables, `__` separating sections.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: PathBuf,
    extra: Option<PathBuf>,
    env: Option<config::Map<String, String>>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), extra: None, env: None }
    }

    /// Adds a required configuration file on top of the project files.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra = Some(path.into());
        self
    }

    /// Replaces the process environment with a fixed set of variables.
    #[must_use]
    pub fn env_source(mut self, vars: config::Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Loads, merges and validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] when a source is missing or malformed and
    /// [`ConfigError::Invalid`] when the merged values fail validation.
    pub fn load(&self) -> Result<HarnessConfig, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::from(self.base_dir.join(CONFIG_FILE)).required(false))
            .add_source(File::from(self.base_dir.join(LOCAL_CONFIG_FILE)).required(false));

        if let Some(extra) = &self.extra {
            info!("Loading config from {}", extra.display());
            builder = builder.add_source(File::from(extra.as_path()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(self.env.clone()),
        );

        let cfg = builder
            .build()
            .map_err(|source| ConfigError::Config { source, context: "failed to build config" })?
            .try_deserialize::<HarnessConfig>()
            .map_err(|source| ConfigError::Config {
                source,
                context: "failed to deserialize config",
            })?;

        validate(&cfg)?;
        debug!(?cfg, "Configuration loaded");
        Ok(cfg)
    }
}

/// Loads the configuration rooted at `base_dir`, with an optional extra file.
///
/// # Errors
/// See [`ConfigLoader::load`].
pub fn load_config(
    base_dir: impl AsRef<Path>,
    extra: Option<&Path>,
) -> Result<HarnessConfig, ConfigError> {
    let mut loader = ConfigLoader::new(base_dir.as_ref());
    if let Some(path) = extra {
        loader = loader.file(path);
    }
    loader.load()
}
