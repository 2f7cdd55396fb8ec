use perfkit_template::fsops::ensure_dir;
use perfkit_template::{Bindings, LinePatch, PlaceholderStyle, TemplateError, instantiate, instantiate_script};
use std::fs;
use tempfile::TempDir;

const SERVER_TEMPLATE: &str = "\
server {
  http_port: HTTP_PORT_PLACEHOLDER
  https_port: HTTPS_PORT_PLACEHOLDER
  cert: \"CERTS_DIR_PLACEHOLDER/HOSTNAME_PLACEHOLDER.crt\"
}
";

#[test]
fn instance_port_is_substituted_and_nothing_else_changes() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("gfe2_config.txt");
    fs::write(&src, SERVER_TEMPLATE).unwrap();
    let dst = temp.path().join("bench_2.txt");

    let index = 2;
    let bindings = Bindings::new().with("HTTP_PORT_PLACEHOLDER", (8888 + index).to_string());
    instantiate(&src, &dst, &bindings, PlaceholderStyle::Literal).unwrap();

    let out = fs::read_to_string(&dst).unwrap();
    assert_eq!(out, SERVER_TEMPLATE.replace("HTTP_PORT_PLACEHOLDER", "8890"));
    assert!(out.contains("http_port: 8890\n"));
    assert!(out.contains("HTTPS_PORT_PLACEHOLDER"), "unbound literal keys stay as they are");
}

#[test]
fn rendering_twice_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("tpl.txt");
    fs::write(&src, SERVER_TEMPLATE).unwrap();
    let bindings: Bindings = [
        ("HTTP_PORT_PLACEHOLDER", "8888"),
        ("HTTPS_PORT_PLACEHOLDER", "8443"),
        ("CERTS_DIR_PLACEHOLDER", "/work/certs"),
        ("HOSTNAME_PLACEHOLDER", "bench"),
    ]
    .into_iter()
    .collect();

    let first = temp.path().join("a.txt");
    let second = temp.path().join("b.txt");
    instantiate(&src, &first, &bindings, PlaceholderStyle::Literal).unwrap();
    instantiate(&src, &second, &bindings, PlaceholderStyle::Literal).unwrap();

    let a = fs::read(&first).unwrap();
    assert_eq!(a, fs::read(&second).unwrap());
    let text = String::from_utf8(a).unwrap();
    assert!(!text.contains("PLACEHOLDER"));
}

#[test]
fn missing_template_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let err = instantiate(
        &temp.path().join("absent.txt"),
        &temp.path().join("out.txt"),
        &Bindings::new(),
        PlaceholderStyle::Delimited,
    )
    .unwrap_err();
    assert!(matches!(err, TemplateError::Io { .. }), "unexpected error: {err}");
}

#[cfg(unix)]
#[test]
fn generated_script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let src = temp.path().join("run_benchmark.py");
    fs::write(&src, "#!/usr/bin/env python3\nROOT = '{{SPEEDTEST_DIR}}'\n").unwrap();
    let bin = temp.path().join("bin");
    ensure_dir(&bin).unwrap();
    let dst = bin.join("run_benchmark.py");

    instantiate_script(
        &src,
        &dst,
        &Bindings::new().with("SPEEDTEST_DIR", "/work"),
        PlaceholderStyle::Delimited,
    )
    .unwrap();

    let mode = fs::metadata(&dst).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
    assert_eq!(fs::read_to_string(&dst).unwrap(), "#!/usr/bin/env python3\nROOT = '/work'\n");
}

#[test]
fn manifest_is_patched_in_place() {
    let temp = TempDir::new().unwrap();
    let manifest = temp.path().join("BUILD");
    fs::write(&manifest, "a\n\"libcronet.1.so\"\nb\n").unwrap();

    let patch = LinePatch::new(r"libcronet\..*\.so", "libcronet.2.so").unwrap();
    assert_eq!(patch.apply_to_file(&manifest).unwrap(), 1);
    assert_eq!(fs::read_to_string(&manifest).unwrap(), "a\n\"libcronet.2.so\"\nb\n");
}
