//! Placeholder vocabulary and the table of helper scripts generated by setup.

use perfkit_template::{Bindings, PlaceholderStyle};

/// How a placeholder is spelled in a template.
///
/// In delimited style the placeholder is always `{{NAME}}`. In literal style it
/// is `NAME_PLACEHOLDER`, or `$NAME_PLACEHOLDER` for shell templates that
/// reference it like a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    name: &'static str,
    shell: bool,
}

impl Placeholder {
    #[must_use]
    pub const fn bare(name: &'static str) -> Self {
        Self { name, shell: false }
    }

    #[must_use]
    pub const fn shell(name: &'static str) -> Self {
        Self { name, shell: true }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The text a template uses for this placeholder in `style`.
    #[must_use]
    pub fn key(&self, style: PlaceholderStyle) -> String {
        match style {
            PlaceholderStyle::Delimited => self.name.to_owned(),
            PlaceholderStyle::Literal if self.shell => format!("${}_PLACEHOLDER", self.name),
            PlaceholderStyle::Literal => format!("{}_PLACEHOLDER", self.name),
        }
    }
}

pub const HTTPS_PORT: Placeholder = Placeholder::bare("HTTPS_PORT");
pub const HTTP_PORT: Placeholder = Placeholder::bare("HTTP_PORT");
pub const STATS_PORT: Placeholder = Placeholder::bare("FASTER_STATS_PORT");
pub const CERTS_DIR: Placeholder = Placeholder::bare("CERTS_DIR");
pub const HOSTNAME: Placeholder = Placeholder::bare("HOSTNAME");

/// Values known once the workspace is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    NativeSrcDir,
    ProfilerScriptsDir,
    Workspace,
    CertsDir,
    ServerConfigsDir,
    Hostname,
}

/// Depot directory a script template is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The speed test directory itself.
    Speedtest,
    /// `bin/` under the speed test directory.
    Scripts,
    /// The benchmark runner directory.
    Benchmark,
}

/// Where a generated script lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Workspace,
    Bin,
}

/// One helper script: template name, locations and the placeholders it binds.
#[derive(Debug, Clone, Copy)]
pub struct ScriptSpec {
    pub name: &'static str,
    pub origin: Origin,
    pub target: Target,
    pub bindings: &'static [(Placeholder, Var)],
}

impl ScriptSpec {
    /// Bindings for `style`, with values looked up through `value`.
    pub fn bindings(&self, style: PlaceholderStyle, value: impl Fn(Var) -> String) -> Bindings {
        self.bindings.iter().map(|(placeholder, var)| (placeholder.key(style), value(*var))).collect()
    }
}

pub const SCRIPTS: &[ScriptSpec] = &[
    ScriptSpec {
        name: "setup_clankium_repo.py",
        origin: Origin::Speedtest,
        target: Target::Workspace,
        bindings: &[(Placeholder::bare("CLANKIUM_SRC_DIR"), Var::NativeSrcDir)],
    },
    ScriptSpec {
        name: "setup_device_certs.sh",
        origin: Origin::Speedtest,
        target: Target::Workspace,
        bindings: &[(CERTS_DIR, Var::CertsDir)],
    },
    ScriptSpec {
        name: "build_and_copy_cronet.py",
        origin: Origin::Scripts,
        target: Target::Bin,
        bindings: &[(Placeholder::bare("CLANKIUM_SRC_DIR"), Var::NativeSrcDir)],
    },
    ScriptSpec {
        name: "build_and_install_app.sh",
        origin: Origin::Scripts,
        target: Target::Bin,
        bindings: &[(Placeholder::shell("SPEEDTEST_DIR"), Var::Workspace)],
    },
    ScriptSpec {
        name: "build_and_run_servers.sh",
        origin: Origin::Scripts,
        target: Target::Bin,
        bindings: &[
            (Placeholder::shell("GFE2_CONFIGS_DIR"), Var::ServerConfigsDir),
            (Placeholder::shell("HOSTNAME"), Var::Hostname),
        ],
    },
    ScriptSpec {
        name: "run_benchmark.py",
        origin: Origin::Benchmark,
        target: Target::Bin,
        bindings: &[
            (Placeholder::bare("SIMPLEPERF_SCRIPTS_DIR"), Var::ProfilerScriptsDir),
            (Placeholder::bare("CLANKIUM_SRC_DIR"), Var::NativeSrcDir),
            (Placeholder::bare("SPEEDTEST_DIR"), Var::Workspace),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_the_style() {
        assert_eq!(HTTP_PORT.key(PlaceholderStyle::Literal), "HTTP_PORT_PLACEHOLDER");
        assert_eq!(HTTP_PORT.key(PlaceholderStyle::Delimited), "HTTP_PORT");

        let shell = Placeholder::shell("HOSTNAME");
        assert_eq!(shell.key(PlaceholderStyle::Literal), "$HOSTNAME_PLACEHOLDER");
        assert_eq!(shell.key(PlaceholderStyle::Delimited), "HOSTNAME");
    }

    #[test]
    fn script_names_are_unique_per_target() {
        for (i, a) in SCRIPTS.iter().enumerate() {
            for b in &SCRIPTS[i + 1..] {
                assert!(a.name != b.name || a.target != b.target, "duplicate {}", a.name);
            }
        }
    }

    #[test]
    fn bindings_resolve_through_lookup() {
        let servers = SCRIPTS.iter().find(|s| s.name == "build_and_run_servers.sh").unwrap();
        let bindings = servers.bindings(PlaceholderStyle::Literal, |var| match var {
            Var::ServerConfigsDir => "/ws/gfe2_configs".to_owned(),
            Var::Hostname => "bench".to_owned(),
            other => panic!("unexpected {other:?}"),
        });

        assert_eq!(bindings.get("$GFE2_CONFIGS_DIR_PLACEHOLDER"), Some("/ws/gfe2_configs"));
        assert_eq!(bindings.get("$HOSTNAME_PLACEHOLDER"), Some("bench"));
        assert_eq!(bindings.len(), 2);
    }
}
