#![cfg(unix)]

use perfkit_template::fsops::make_executable;
use perfkit_toolchain::{CertificateAuthority, FilePattern, IssueParams, Openssl, SystemRunner};
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Writes a stand-in for the TLS toolkit that appends its arguments to `log`.
fn fake_toolkit(dir: &Path, log: &Path, exit_on: Option<&str>) -> std::path::PathBuf {
    let script = dir.join("fake-openssl");
    let fail = exit_on.map_or_else(String::new, |sub| {
        format!("if [ \"$1\" = \"{sub}\" ]; then exit 7; fi\n")
    });
    fs::write(&script, format!("#!/bin/sh\necho \"$*\" >> '{}'\n{fail}", log.display())).unwrap();
    make_executable(&script).unwrap();
    script
}

fn params() -> IssueParams {
    IssueParams { key_bits: 1024, validity_days: 30, subject: "/O=Test".to_owned() }
}

#[test]
#[serial]
fn toolkit_receives_expected_invocations() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("calls.log");
    let program = fake_toolkit(temp.path(), &log, None);
    let ca = CertificateAuthority {
        cert: temp.path().join("rootCA.pem"),
        key: temp.path().join("rootCA.key"),
    };

    let runner = SystemRunner;
    let files = Openssl::new(&runner, program.to_string_lossy())
        .issue_host_certificate(&ca, temp.path(), "bench-01", &params())
        .unwrap();

    let calls = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = calls.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], format!("genrsa -out {} 1024", files.key.display()));
    assert!(lines[1].contains("-subj /O=Test/CN=bench-01 -new -sha256"));
    assert!(lines[2].starts_with("x509 -req -extfile "));
    assert!(lines[2].contains(" -days 30 "));
    assert_eq!(lines[3], format!("x509 -in {} -text -noout", files.cert.display()));
}

#[test]
#[serial]
fn toolkit_failure_propagates_exit_code() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("calls.log");
    let program = fake_toolkit(temp.path(), &log, Some("x509"));
    let ca = CertificateAuthority {
        cert: temp.path().join("rootCA.pem"),
        key: temp.path().join("rootCA.key"),
    };

    let runner = SystemRunner;
    let err = Openssl::new(&runner, program.to_string_lossy())
        .issue_host_certificate(&ca, temp.path(), "bench-01", &params())
        .unwrap_err();

    assert_eq!(err.exit_code(), Some(7));
    assert_eq!(fs::read_to_string(&log).unwrap().lines().count(), 3);
}

#[test]
fn built_library_is_found_by_glob() {
    let temp = TempDir::new().unwrap();
    let lib_dir = temp.path().join("lib.unstripped");
    fs::create_dir_all(&lib_dir).unwrap();
    fs::write(lib_dir.join("libcronet.80.0.3987.0.so"), b"\x7fELF").unwrap();
    fs::write(lib_dir.join("libbase.so"), b"\x7fELF").unwrap();

    let found = FilePattern::new("libcronet.*.so").unwrap().find_first(&lib_dir).unwrap();
    assert_eq!(found.file_name().unwrap(), "libcronet.80.0.3987.0.so");
}
