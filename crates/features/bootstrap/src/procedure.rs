use crate::error::BootstrapError;
use crate::scripts::{self, Origin, SCRIPTS, ScriptSpec, Target, Var};
use perfkit_domain::config::{HarnessConfig, HostConfig, TemplateStyle};
use perfkit_domain::ports::InstancePorts;
use perfkit_kernel::config::persist_source_dir;
use perfkit_template::fsops::{copy_into, ensure_dir};
use perfkit_template::{Bindings, PlaceholderStyle, Template, instantiate_script};
use perfkit_toolchain::{
    CertificateAuthority, CommandRunner, CommandSpec, HostCertificate, IssueParams, Openssl,
};
use std::path::{Component, Path, PathBuf};
use tracing::info;

const CERTS_DIR: &str = "certs";
const SERVER_CONFIGS_DIR: &str = "gfe2_configs";
const SCRIPTS_DIR: &str = "bin";

/// Operator inputs of a setup run.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Directory being prepared; generated files land here.
    pub workspace: PathBuf,
    /// Native library source tree, recorded for later builds.
    pub native_src_dir: PathBuf,
    /// Profiler helper scripts referenced by the benchmark runner.
    pub profiler_scripts_dir: PathBuf,
}

/// Files produced by a setup run.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub host: String,
    pub copied: Vec<PathBuf>,
    pub certificate: HostCertificate,
    pub server_configs: Vec<PathBuf>,
    pub scripts: Vec<PathBuf>,
    pub local_config: PathBuf,
}

#[must_use]
pub const fn placeholder_style(style: TemplateStyle) -> PlaceholderStyle {
    match style {
        TemplateStyle::Literal => PlaceholderStyle::Literal,
        TemplateStyle::Delimited => PlaceholderStyle::Delimited,
    }
}

/// Configured host name, or the trimmed output of `hostname`.
///
/// # Errors
/// Returns [`BootstrapError::Tool`] if `hostname` fails and
/// [`BootstrapError::EmptyHostname`] if the result is blank.
pub fn resolve_host<R: CommandRunner + ?Sized>(
    host: &HostConfig,
    runner: &R,
) -> Result<String, BootstrapError> {
    let name = match &host.name {
        Some(name) => name.trim().to_owned(),
        None => runner.output(&CommandSpec::new("hostname"))?.trim().to_owned(),
    };
    if name.is_empty() {
        return Err(BootstrapError::EmptyHostname);
    }
    Ok(name)
}

/// Prepares `opts.workspace` for benchmark runs.
///
/// Steps run in a fixed order and the first failure aborts the run; files
/// written by earlier steps stay in place.
///
/// # Errors
/// Returns the error of the first failing step.
pub fn run<R: CommandRunner + ?Sized>(
    cfg: &HarnessConfig,
    opts: &BootstrapOptions,
    runner: &R,
) -> Result<BootstrapReport, BootstrapError> {
    let native_src_dir = absolute(&opts.native_src_dir)?;
    let profiler_scripts_dir = absolute(&opts.profiler_scripts_dir)?;
    let workspace = absolute(&opts.workspace)?;
    let host = resolve_host(&cfg.host, runner)?;
    info!(host, workspace = %workspace.display(), "Bootstrapping workspace");

    let setup = Setup {
        cfg,
        runner,
        style: placeholder_style(cfg.templates.style),
        depot: workspace.join(cfg.depot.speedtest_path()),
        benchmark: workspace.join(cfg.depot.benchmark_path()),
        certs: workspace.join(CERTS_DIR),
        configs: workspace.join(SERVER_CONFIGS_DIR),
        bin: workspace.join(SCRIPTS_DIR),
        workspace,
        native_src_dir,
        profiler_scripts_dir,
        host,
    };

    let copied = setup.copy_trust_material()?;
    let certificate = setup.issue_certificate()?;
    let server_configs = setup.render_server_configs()?;
    let scripts = setup.render_scripts()?;
    let local_config = persist_source_dir(&setup.workspace, &setup.native_src_dir)?;

    info!("Setup complete.");
    Ok(BootstrapReport {
        host: setup.host,
        copied,
        certificate,
        server_configs,
        scripts,
        local_config,
    })
}

/// Absolute form of `path` with `.` and `..` folded away lexically.
fn absolute(path: &Path) -> Result<PathBuf, BootstrapError> {
    let joined = std::path::absolute(path)
        .map_err(|source| BootstrapError::Path { path: path.to_path_buf(), source })?;

    let mut normal = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                normal.pop();
            },
            other => normal.push(other),
        }
    }
    Ok(normal)
}

struct Setup<'a, R: ?Sized> {
    cfg: &'a HarnessConfig,
    runner: &'a R,
    style: PlaceholderStyle,
    depot: PathBuf,
    benchmark: PathBuf,
    workspace: PathBuf,
    certs: PathBuf,
    configs: PathBuf,
    bin: PathBuf,
    native_src_dir: PathBuf,
    profiler_scripts_dir: PathBuf,
    host: String,
}

impl<R: CommandRunner + ?Sized> Setup<'_, R> {
    fn copy_trust_material(&self) -> Result<Vec<PathBuf>, BootstrapError> {
        ensure_dir(&self.certs)?;
        let source = self.workspace.join(self.cfg.depot.certs_path());
        let copied = self
            .cfg
            .depot
            .certs
            .iter()
            .map(|name| copy_into(&source.join(name), &self.certs))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(copied)
    }

    fn issue_certificate(&self) -> Result<HostCertificate, BootstrapError> {
        let tls = &self.cfg.tls;
        let ca = CertificateAuthority {
            cert: self.certs.join(&tls.root_cert),
            key: self.certs.join(&tls.root_key),
        };
        let params = IssueParams {
            key_bits: tls.key_bits,
            validity_days: tls.validity_days,
            subject: tls.subject.clone(),
        };
        let cert = Openssl::new(self.runner, tls.openssl.as_str())
            .issue_host_certificate(&ca, &self.certs, &self.host, &params)?;
        Ok(cert)
    }

    fn render_server_configs(&self) -> Result<Vec<PathBuf>, BootstrapError> {
        ensure_dir(&self.configs)?;
        let source = self.workspace.join(self.cfg.depot.server_config_template_path());
        let template = Template::load(&source, self.style)?;

        let plan = self.cfg.servers.plan();
        let mut written = Vec::with_capacity(usize::from(plan.count()));
        for index in 0..plan.count() {
            let ports = plan.ports(index).ok_or(BootstrapError::Ports { index })?;
            let dest = self.configs.join(format!("{}_{index}.txt", self.host));
            template.render_to(&self.server_bindings(ports), &dest)?;
            info!(
                index,
                https = ports.https,
                http = ports.http,
                stats = ports.stats,
                path = %dest.display(),
                "Generated server config"
            );
            written.push(dest);
        }
        Ok(written)
    }

    fn server_bindings(&self, ports: InstancePorts) -> Bindings {
        Bindings::new()
            .with(scripts::HTTPS_PORT.key(self.style), ports.https.to_string())
            .with(scripts::HTTP_PORT.key(self.style), ports.http.to_string())
            .with(scripts::STATS_PORT.key(self.style), ports.stats.to_string())
            .with(scripts::CERTS_DIR.key(self.style), self.value(Var::CertsDir))
            .with(scripts::HOSTNAME.key(self.style), self.value(Var::Hostname))
    }

    fn render_scripts(&self) -> Result<Vec<PathBuf>, BootstrapError> {
        ensure_dir(&self.bin)?;
        let mut written = Vec::with_capacity(SCRIPTS.len());
        for script in SCRIPTS {
            written.push(self.render_script(script)?);
        }
        Ok(written)
    }

    fn render_script(&self, script: &ScriptSpec) -> Result<PathBuf, BootstrapError> {
        let src_dir = match script.origin {
            Origin::Speedtest => self.depot.clone(),
            Origin::Scripts => self.workspace.join(self.cfg.depot.scripts_path()),
            Origin::Benchmark => self.benchmark.clone(),
        };
        let dest_dir = match script.target {
            Target::Workspace => &self.workspace,
            Target::Bin => &self.bin,
        };
        let dest = dest_dir.join(script.name);
        let bindings = script.bindings(self.style, |var| self.value(var));
        instantiate_script(&src_dir.join(script.name), &dest, &bindings, self.style)?;
        info!(path = %dest.display(), "Generated script");
        Ok(dest)
    }

    fn value(&self, var: Var) -> String {
        let path = match var {
            Var::Hostname => return self.host.clone(),
            Var::NativeSrcDir => &self.native_src_dir,
            Var::ProfilerScriptsDir => &self.profiler_scripts_dir,
            Var::Workspace => &self.workspace,
            Var::CertsDir => &self.certs,
            Var::ServerConfigsDir => &self.configs,
        };
        path.display().to_string()
    }
}
