//! CLI end-to-end tests that invoke the compiled `jnlp` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn jnlp_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jnlp"));
    for var in ["RUST_LOG", "http_proxy", "HTTP_PROXY", "all_proxy", "ALL_PROXY"] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_manifest(dir: &Path, xml: &str) -> PathBuf {
    let path = dir.join("app.jnlp");
    fs::write(&path, xml).unwrap();
    path
}

// ============================================================================
// Usage and argument errors
// ============================================================================

#[test]
fn test_no_manifest_prints_usage() {
    jnlp_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("propsjar=PATH"));
}

#[test]
fn test_settings_without_manifest_print_usage() {
    jnlp_cmd()
        .args(["java=/opt/jre/bin/java", "debug=true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_help_flag() {
    jnlp_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("JNLP"));
}

#[test]
fn test_unknown_option() {
    jnlp_cmd()
        .args(["colour=red", "app.jnlp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Unknown option: colour"));
}

#[test]
fn test_duplicate_option() {
    jnlp_cmd()
        .args(["temp=/a", "temp=/b", "app.jnlp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Duplicate option: temp"));
}

#[test]
fn test_two_manifests() {
    jnlp_cmd()
        .args(["a.jnlp", "b.jnlp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("More than one manifest"));
}

#[test]
fn test_bad_debug_value() {
    jnlp_cmd()
        .args(["debug=maybe", "app.jnlp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for debug"));
}

#[test]
fn test_invalid_blacklist() {
    jnlp_cmd()
        .args(["blacklist=(", "app.jnlp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid exclusion pattern"));
}

#[test]
fn test_missing_config_file() {
    jnlp_cmd()
        .args(["config=/nonexistent/jnlp.toml", "app.jnlp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/jnlp.toml"));
}

#[test]
fn test_missing_runtime() {
    let temp = TempDir::new().unwrap();
    let manifest = write_manifest(
        temp.path(),
        r#"<jnlp spec="1.0+" codebase="http://127.0.0.1:9/"><resources><jar href="a.jar"/></resources></jnlp>"#,
    );

    jnlp_cmd()
        .arg("java=/nonexistent/bin/java")
        .arg(format!("temp={}", temp.path().join("tmp").display()))
        .arg(&manifest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to execute /nonexistent/bin/java"));
}

#[test]
fn test_manifest_error_reported_before_runtime_error() {
    let temp = TempDir::new().unwrap();
    let manifest = write_manifest(
        temp.path(),
        r#"<jnlp spec="1.0+"><resources><jar href="a.jar"/></resources></jnlp>"#,
    );

    jnlp_cmd()
        .arg("java=/nonexistent/bin/java")
        .arg(format!("temp={}", temp.path().join("tmp").display()))
        .arg(&manifest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Manifest has no codebase"))
        .stderr(predicate::str::contains("Failed to execute").not());
}

// ============================================================================
// Full runs against a fake runtime
// ============================================================================

#[cfg(unix)]
mod unix {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::os::unix::fs::PermissionsExt;
    use std::thread::{self, JoinHandle};

    /// A `java` stand-in: answers the properties probe with JSON, otherwise
    /// logs its arguments one per line and exits 5.
    fn fake_java(dir: &Path) -> (PathBuf, PathBuf) {
        let log = dir.join("java-args.log");
        let script = dir.join("java");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 case \"$2\" in\n\
                   *PrintProps.jar) echo '{{\"os.name\":\"Linux\",\"os.arch\":\"amd64\",\"java.version\":\"1.8.0_292\"}}'; exit 0;;\n\
                 esac\n\
                 printf '%s\\n' \"$@\" > '{}'\n\
                 exit 5\n",
                log.display()
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }

    fn serve_once(body: &'static [u8]) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(body).unwrap();
            stream.flush().unwrap();
        });

        (format!("http://{addr}/app/"), handle)
    }

    #[test]
    fn test_application_exit_code_is_propagated() {
        let temp = TempDir::new().unwrap();
        let (java, log) = fake_java(temp.path());
        let (codebase, server) = serve_once(b"PK-not-really");
        let manifest = write_manifest(
            temp.path(),
            &format!(
                r#"<jnlp spec="1.0+" codebase="{codebase}">
                     <resources><jar href="viewer.jar"/></resources>
                     <application-desc main-class="com.example.Viewer">
                       <argument>host=10.0.0.1</argument>
                     </application-desc>
                   </jnlp>"#
            ),
        );
        let tmp = temp.path().join("tmp");

        jnlp_cmd()
            .arg(format!("java={}", java.display()))
            .arg(format!("propsjar={}", temp.path().join("PrintProps.jar").display()))
            .arg(format!("security={}", temp.path().join("java.security").display()))
            .arg(format!("temp={}", tmp.display()))
            .arg(&manifest)
            .assert()
            .code(5);
        server.join().unwrap();

        let args = fs::read_to_string(&log).unwrap();
        let args: Vec<&str> = args.lines().collect();
        assert!(args[0].starts_with("-Djava.library.path="));
        assert_eq!(
            args[1],
            format!(
                "-Djava.security.properties={}",
                temp.path().join("java.security").display()
            )
        );
        assert_eq!(args[2], "-cp");
        assert!(args[3].ends_with("/viewer.jar"));
        assert_eq!(args[4..], ["com.example.Viewer", "host=10.0.0.1"]);

        // Run directory removed, temp root left behind.
        assert!(tmp.is_dir());
        assert_eq!(fs::read_dir(&tmp).unwrap().count(), 0);
    }

    #[test]
    fn test_debug_keeps_downloads() {
        let temp = TempDir::new().unwrap();
        let (java, _log) = fake_java(temp.path());
        let (codebase, server) = serve_once(b"jar");
        let manifest = write_manifest(
            temp.path(),
            &format!(
                r#"<jnlp spec="1.0+" codebase="{codebase}"><resources><jar href="viewer.jar"/></resources></jnlp>"#
            ),
        );
        let tmp = temp.path().join("tmp");

        jnlp_cmd()
            .arg(format!("java={}", java.display()))
            .arg(format!("propsjar={}", temp.path().join("PrintProps.jar").display()))
            .arg(format!("temp={}", tmp.display()))
            .arg("debug=true")
            .arg(&manifest)
            .assert()
            .code(5)
            .stderr(predicate::str::contains("Debug mode"));
        server.join().unwrap();

        let run_dirs: Vec<_> = fs::read_dir(&tmp).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(run_dirs.len(), 1);
        assert_eq!(fs::read(run_dirs[0].join("viewer.jar")).unwrap(), b"jar");
    }

    #[test]
    fn test_manifest_from_stdin_rejected() {
        let temp = TempDir::new().unwrap();
        let (java, log) = fake_java(temp.path());

        jnlp_cmd()
            .arg(format!("java={}", java.display()))
            .arg(format!("propsjar={}", temp.path().join("PrintProps.jar").display()))
            .arg(format!("temp={}", temp.path().join("tmp").display()))
            .arg("-")
            .write_stdin(r#"<jnlp spec="1.0+"><resources/></jnlp>"#)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Manifest has no codebase"));

        assert!(!log.exists());
    }
}
