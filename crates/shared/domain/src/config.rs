use crate::ports::PortPlan;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level harness configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub depot: DepotConfig,
    pub servers: ServersConfig,
    pub tls: TlsConfig,
    pub host: HostConfig,
    pub templates: TemplatesConfig,
    pub build: BuildConfig,
}

/// Read-only source tree holding trust-root material and templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepotConfig {
    pub root: PathBuf,
    /// Speed test directory, relative to `root`.
    pub speedtest_dir: PathBuf,
    /// Benchmark runner directory, relative to `root`.
    pub benchmark_dir: PathBuf,
    /// Files copied from `<speedtest_dir>/certs` into the workspace.
    pub certs: Vec<String>,
    /// Server config template, relative to `speedtest_dir`.
    pub server_config_template: PathBuf,
}

impl DepotConfig {
    #[must_use]
    pub fn speedtest_path(&self) -> PathBuf {
        self.root.join(&self.speedtest_dir)
    }

    #[must_use]
    pub fn benchmark_path(&self) -> PathBuf {
        self.root.join(&self.benchmark_dir)
    }

    #[must_use]
    pub fn certs_path(&self) -> PathBuf {
        self.speedtest_path().join("certs")
    }

    #[must_use]
    pub fn scripts_path(&self) -> PathBuf {
        self.speedtest_path().join("bin")
    }

    #[must_use]
    pub fn server_config_template_path(&self) -> PathBuf {
        self.speedtest_path().join(&self.server_config_template)
    }
}

/// Local server pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServersConfig {
    pub count: u16,
    pub https_port: u16,
    pub http_port: u16,
    pub stats_port: u16,
}

impl ServersConfig {
    #[must_use]
    pub const fn plan(&self) -> PortPlan {
        PortPlan::new(self.https_port, self.http_port, self.stats_port, self.count)
    }
}

/// Host certificate issuance through the system TLS toolkit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub openssl: String,
    pub key_bits: u32,
    pub validity_days: u32,
    /// Subject prefix; `/CN=<host>` is appended.
    pub subject: String,
    pub root_key: String,
    pub root_cert: String,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Overrides the name reported by `hostname`.
    pub name: Option<String>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    /// Bare placeholder names matched as exact substrings.
    Literal,
    /// `{{NAME}}` placeholders.
    #[default]
    Delimited,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub style: TemplateStyle,
}

/// One target architecture of the native build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// Build output directory, relative to the native source tree.
    pub out_dir: PathBuf,
    /// Directory name under the deploy destination.
    pub abi: String,
}

/// Native library build and deploy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub driver: String,
    pub target: String,
    pub source_dir: Option<PathBuf>,
    pub architectures: Vec<Architecture>,
    pub library_subdir: PathBuf,
    pub library_glob: String,
    pub archive_subdir: PathBuf,
    pub archive_glob: String,
    pub destination: PathBuf,
    pub manifest: String,
    pub manifest_pattern: String,
}

// --- Default ---

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            speedtest_dir: PathBuf::from("gfe/quic/tools/cronetspeedtest"),
            benchmark_dir: PathBuf::from("third_party/py/cronetspeedtest"),
            certs: vec!["rootCA.key".to_owned(), "rootCA.pem".to_owned(), "f440b82c.0".to_owned()],
            server_config_template: PathBuf::from("gfe2_configs/gfe2_config.txt"),
        }
    }
}

impl Default for ServersConfig {
    fn default() -> Self {
        Self { count: 4, https_port: 8443, http_port: 8888, stats_port: 6441 }
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            openssl: "openssl".to_owned(),
            key_bits: 2048,
            validity_days: 365,
            subject: "/C=CN/ST=GD/L=SZ/O=Acme, Inc.".to_owned(),
            root_key: "rootCA.key".to_owned(),
            root_cert: "rootCA.pem".to_owned(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            driver: "autoninja".to_owned(),
            target: "cronet_package".to_owned(),
            source_dir: None,
            architectures: vec![
                Architecture {
                    out_dir: PathBuf::from("out/cronetspeedtest_arm64"),
                    abi: "arm64-v8a".to_owned(),
                },
                Architecture {
                    out_dir: PathBuf::from("out/cronetspeedtest_armeabi-v7a"),
                    abi: "armeabi-v7a".to_owned(),
                },
            ],
            library_subdir: PathBuf::from("lib.unstripped"),
            library_glob: "libcronet.*.so".to_owned(),
            archive_subdir: PathBuf::from("cronet"),
            archive_glob: "*.jar".to_owned(),
            destination: PathBuf::from("third_party/java/android_libs/cronet/current"),
            manifest: "BUILD".to_owned(),
            manifest_pattern: r"libcronet\..*\.so".to_owned(),
        }
    }
}
