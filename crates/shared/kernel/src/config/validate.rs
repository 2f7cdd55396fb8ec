use super::ConfigError;
use perfkit_domain::config::HarnessConfig;
use regex::Regex;

/// Checks the merged configuration before any procedure runs.
///
/// # Errors
/// Returns [`ConfigError::Invalid`] naming the first offending field.
pub fn validate(cfg: &HarnessConfig) -> Result<(), ConfigError> {
    let servers = &cfg.servers;
    if servers.count == 0 {
        return Err(invalid("servers.count", "at least one server instance is required"));
    }
    if !servers.plan().fits() {
        return Err(invalid(
            "servers.count",
            format!("{} instances overflow the configured base ports", servers.count),
        ));
    }

    if cfg.tls.key_bits == 0 {
        return Err(invalid("tls.key_bits", "must be greater than zero"));
    }
    if cfg.tls.validity_days == 0 {
        return Err(invalid("tls.validity_days", "must be greater than zero"));
    }
    if cfg.tls.openssl.trim().is_empty() {
        return Err(invalid("tls.openssl", "program name cannot be empty"));
    }

    if cfg.host.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(invalid("host.name", "cannot be empty when set"));
    }

    let build = &cfg.build;
    if build.architectures.is_empty() {
        return Err(invalid("build.architectures", "at least one architecture is required"));
    }
    if build.driver.trim().is_empty() {
        return Err(invalid("build.driver", "program name cannot be empty"));
    }
    if build.library_glob.trim().is_empty() {
        return Err(invalid("build.library_glob", "pattern cannot be empty"));
    }
    Regex::new(&build.manifest_pattern)
        .map_err(|e| invalid("build.manifest_pattern", e.to_string()))?;

    Ok(())
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        validate(&HarnessConfig::default()).unwrap();
    }

    #[test]
    fn port_overflow_is_rejected() {
        let mut cfg = HarnessConfig::default();
        cfg.servers.https_port = u16::MAX;
        cfg.servers.count = 2;
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("overflow"), "unexpected error: {err}");
    }

    #[test]
    fn bad_manifest_pattern_is_rejected() {
        let mut cfg = HarnessConfig::default();
        cfg.build.manifest_pattern = "libcronet(".to_owned();
        let err = validate(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "build.manifest_pattern", .. }));
    }

    #[test]
    fn empty_architecture_list_is_rejected() {
        let mut cfg = HarnessConfig::default();
        cfg.build.architectures.clear();
        assert!(validate(&cfg).is_err());
    }
}
