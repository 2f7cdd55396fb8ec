//! Host certificate issuance through the `openssl` command line.
//!
//! Nothing cryptographic happens in-process: this module assembles the
//! `genrsa`, `req` and `x509` invocations and owns the temporary extension
//! file that carries the subject alternative name.

use crate::command::{CommandRunner, CommandSpec};
use crate::error::ToolError;
use perfkit_template::fsops::remove_if_exists;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// A local root authority: self-signed certificate plus its private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateAuthority {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl CertificateAuthority {
    /// Serial file that `-CAcreateserial` writes next to the certificate.
    #[must_use]
    pub fn serial_path(&self) -> PathBuf {
        self.cert.with_extension("srl")
    }
}

/// Key, signing request and certificate of one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCertificate {
    pub key: PathBuf,
    pub csr: PathBuf,
    pub cert: PathBuf,
}

impl HostCertificate {
    /// `<dir>/<host>.key`, `<dir>/<host>.csr` and `<dir>/<host>.crt`.
    #[must_use]
    pub fn in_dir(dir: &Path, host: &str) -> Self {
        Self {
            key: dir.join(format!("{host}.key")),
            csr: dir.join(format!("{host}.csr")),
            cert: dir.join(format!("{host}.crt")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueParams {
    pub key_bits: u32,
    pub validity_days: u32,
    /// Distinguished name prefix; `/CN=<host>` is appended.
    pub subject: String,
}

#[derive(Debug)]
pub struct Openssl<'r, R: ?Sized> {
    runner: &'r R,
    program: String,
}

impl<'r, R: CommandRunner + ?Sized> Openssl<'r, R> {
    pub fn new(runner: &'r R, program: impl Into<String>) -> Self {
        Self { runner, program: program.into() }
    }

    fn command(&self, subcommand: &str) -> CommandSpec {
        CommandSpec::new(&self.program).arg(subcommand)
    }

    pub fn generate_key(&self, out: &Path, bits: u32) -> Result<(), ToolError> {
        self.runner.run(&self.command("genrsa").arg("-out").arg(out).arg(bits.to_string()))
    }

    pub fn signing_request(&self, key: &Path, subject: &str, out: &Path) -> Result<(), ToolError> {
        let cmd = self
            .command("req")
            .arg("-key")
            .arg(key)
            .args(["-subj", subject, "-new", "-sha256", "-out"])
            .arg(out);
        self.runner.run(&cmd)
    }

    pub fn sign(
        &self,
        csr: &Path,
        ca: &CertificateAuthority,
        ext_file: &Path,
        days: u32,
        out: &Path,
    ) -> Result<(), ToolError> {
        let cmd = self
            .command("x509")
            .args(["-req", "-extfile"])
            .arg(ext_file)
            .args(["-days".to_owned(), days.to_string(), "-in".to_owned()])
            .arg(csr)
            .arg("-CA")
            .arg(&ca.cert)
            .arg("-CAkey")
            .arg(&ca.key)
            .arg("-CAcreateserial")
            .arg("-out")
            .arg(out);
        self.runner.run(&cmd)
    }

    /// Prints the decoded certificate to standard output.
    pub fn print(&self, cert: &Path) -> Result<(), ToolError> {
        self.runner.run(&self.command("x509").arg("-in").arg(cert).args(["-text", "-noout"]))
    }

    /// Issues a certificate for `host` into `dir`, signed by `ca`.
    ///
    /// Stale host files and the authority's serial file are removed first.
    /// The subject alternative name is passed through a temporary extension
    /// file that is deleted once signing is done.
    ///
    /// # Errors
    /// Returns the first failing `openssl` invocation or file operation.
    pub fn issue_host_certificate(
        &self,
        ca: &CertificateAuthority,
        dir: &Path,
        host: &str,
        params: &IssueParams,
    ) -> Result<HostCertificate, ToolError> {
        let files = HostCertificate::in_dir(dir, host);
        for stale in [&ca.serial_path(), &files.key, &files.csr, &files.cert] {
            remove_if_exists(stale)?;
        }

        self.generate_key(&files.key, params.key_bits)?;

        let subject = format!("{}/CN={host}", params.subject.trim_end_matches('/'));
        self.signing_request(&files.key, &subject, &files.csr)?;

        let mut ext = tempfile::Builder::new()
            .prefix("perfkit-san-")
            .suffix(".ext")
            .tempfile()
            .map_err(|source| ToolError::Io { what: "extension file", source })?;
        writeln!(ext, "subjectAltName=DNS:{host}")
            .and_then(|()| ext.flush())
            .map_err(|source| ToolError::Io { what: "extension file", source })?;

        self.sign(&files.csr, ca, ext.path(), params.validity_days, &files.cert)?;
        ext.close().map_err(|source| ToolError::Io { what: "extension file cleanup", source })?;

        info!(host, cert = %files.cert.display(), "Issued host certificate");
        self.print(&files.cert)?;
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRunner;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::tempdir;

    fn params() -> IssueParams {
        IssueParams { key_bits: 2048, validity_days: 365, subject: "/C=CN/O=Acme, Inc.".to_owned() }
    }

    fn authority(dir: &Path) -> CertificateAuthority {
        CertificateAuthority { cert: dir.join("rootCA.pem"), key: dir.join("rootCA.key") }
    }

    #[test]
    fn issues_in_toolkit_order() {
        let dir = tempdir().unwrap();
        let runner = RecordingRunner::new();
        let ssl = Openssl::new(&runner, "openssl");

        let files =
            ssl.issue_host_certificate(&authority(dir.path()), dir.path(), "bench", &params()).unwrap();

        let calls = runner.calls();
        let subcommands: Vec<_> =
            calls.iter().map(|c| c.get_args()[0].to_string_lossy().into_owned()).collect();
        assert_eq!(subcommands, ["genrsa", "req", "x509", "x509"]);

        assert_eq!(calls[0].flag_value("-out"), Some(files.key.as_os_str()));
        assert_eq!(calls[0].get_args().last().unwrap(), "2048");
        assert_eq!(
            calls[1].flag_value("-subj").unwrap().to_string_lossy(),
            "/C=CN/O=Acme, Inc./CN=bench"
        );
        assert_eq!(calls[2].flag_value("-days").unwrap(), "365");
        assert_eq!(calls[2].flag_value("-CA"), Some(dir.path().join("rootCA.pem").as_os_str()));
        assert!(calls[2].get_args().iter().any(|a| a == "-CAcreateserial"));
        assert_eq!(calls[3].flag_value("-in"), Some(files.cert.as_os_str()));
    }

    #[test]
    fn extension_file_names_host_and_is_removed() {
        let dir = tempdir().unwrap();
        let seen: Rc<RefCell<Option<(PathBuf, String)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let runner = RecordingRunner::new().with_hook(move |cmd| {
            if let Some(ext) = cmd.flag_value("-extfile") {
                let content = fs::read_to_string(ext).unwrap();
                *sink.borrow_mut() = Some((PathBuf::from(ext), content));
            }
            Ok(())
        });

        Openssl::new(&runner, "openssl")
            .issue_host_certificate(&authority(dir.path()), dir.path(), "bench", &params())
            .unwrap();

        let (path, content) = seen.borrow_mut().take().expect("x509 -req should see the extfile");
        assert_eq!(content.trim(), "subjectAltName=DNS:bench");
        assert!(!path.exists(), "extension file must be removed after signing");
    }

    #[test]
    fn stale_files_are_removed_before_issuing() {
        let dir = tempdir().unwrap();
        let ca = authority(dir.path());
        let stale = HostCertificate::in_dir(dir.path(), "bench");
        for path in [&stale.key, &stale.csr, &stale.cert, &ca.serial_path()] {
            fs::write(path, "old").unwrap();
        }

        let runner = RecordingRunner::new();
        Openssl::new(&runner, "openssl")
            .issue_host_certificate(&ca, dir.path(), "bench", &params())
            .unwrap();

        assert!(!stale.key.exists());
        assert!(!ca.serial_path().exists());
    }

    #[test]
    fn failing_step_stops_issuance() {
        let dir = tempdir().unwrap();
        let runner = RecordingRunner::new().fail_when(" req ", 1);

        let err = Openssl::new(&runner, "openssl")
            .issue_host_certificate(&authority(dir.path()), dir.path(), "bench", &params())
            .unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(runner.calls().len(), 2, "nothing runs after the failing request");
    }
}
