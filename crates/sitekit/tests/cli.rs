use assert_cmd::Command;
use insta::assert_snapshot;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use tempfile::tempdir;

fn sitekit() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitekit"));
    cmd.env_remove("SITEKIT_FIX_TARGET")
        .env_remove("SITEKIT_PORT")
        .env_remove("SITEKIT_HOST")
        .env_remove("SITEKIT_ROOT")
        .env_remove("SITEKIT_PROGRESS");
    cmd
}

#[test]
fn fix_strips_leading_parens_and_keeps_backup() {
    let dir = tempdir().expect("tempdir should work");
    let path = dir.path().join("app.js");
    fs::write(&path, "))\nfoo();\n").expect("write should work");

    sitekit()
        .args(["fix", path.to_str().expect("path utf8")])
        .assert()
        .success()
        .stdout(contains("removed 2 leading ')' from line 1"));

    assert_eq!(fs::read_to_string(&path).expect("read"), "\nfoo();\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("app.js.backup")).expect("backup should exist"),
        "))\nfoo();\n"
    );
}

#[test]
fn fix_appends_missing_closing_braces() {
    let dir = tempdir().expect("tempdir should work");
    let path = dir.path().join("app.js");
    fs::write(&path, "a {\nb {\nc {\n}\n").expect("write should work");

    sitekit()
        .args(["fix", path.to_str().expect("path utf8")])
        .assert()
        .success()
        .stdout(contains("braces: 3 open, 1 close").and(contains("appended 2 closing brace(s)")));

    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "a {\nb {\nc {\n}\n}\n}\n"
    );
}

#[test]
fn fix_missing_file_exits_with_failure() {
    let dir = tempdir().expect("tempdir should work");
    let path = dir.path().join("absent.js");

    sitekit()
        .args(["fix", path.to_str().expect("path utf8")])
        .assert()
        .code(1)
        .stderr(contains("file not found"));

    assert!(!dir.path().join("absent.js.backup").exists());
}

#[test]
fn fix_clean_file_reports_no_changes() {
    let dir = tempdir().expect("tempdir should work");
    let path = dir.path().join("ok.js");
    fs::write(&path, "function ok() {\n  return 1;\n}\n").expect("write should work");

    sitekit()
        .args(["fix", path.to_str().expect("path utf8")])
        .assert()
        .success()
        .stdout(contains("no changes needed").and(contains("appended").not()));
}

#[test]
fn fix_without_argument_uses_default_target() {
    let dir = tempdir().expect("tempdir should work");
    let views = dir.path().join("js").join("views");
    fs::create_dir_all(&views).expect("mkdir should work");
    let target = views.join("zero-trust-executive-platform.js");
    fs::write(
        &target,
        "class Platform {\n    exportReport() {\n        console.log('📄 Exporting comp\n        stray text\n    }\n}\n",
    )
    .expect("write should work");

    sitekit()
        .arg("fix")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("replaced incomplete exportReport() body after line 2"));

    let repaired = fs::read_to_string(&target).expect("read");
    assert!(repaired.contains("PDF/Excel report.');"));
    assert!(!repaired.contains("stray text"));
    assert!(views.join("zero-trust-executive-platform.js.backup").exists());
}

#[test]
fn fix_target_comes_from_config_file() {
    let dir = tempdir().expect("tempdir should work");
    fs::write(
        dir.path().join("sitekit.json"),
        r#"{ "fix_target": "src/main.js" }"#,
    )
    .expect("write should work");
    fs::create_dir(dir.path().join("src")).expect("mkdir should work");
    fs::write(dir.path().join("src").join("main.js"), "start();\n").expect("write should work");

    sitekit()
        .arg("fix")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("wrote src/main.js"));

    assert!(dir.path().join("src").join("main.js.backup").exists());
}

#[test]
fn snapshot_fix_stdout() {
    let dir = tempdir().expect("tempdir should work");
    fs::write(dir.path().join("app.js"), "))\nfoo();\n").expect("write should work");

    let output = sitekit()
        .args(["fix", "app.js"])
        .current_dir(dir.path())
        .output()
        .expect("command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_snapshot!(stdout.trim_end(), @r"
    created backup app.js.backup
    removed 2 leading ')' from line 1
    warning: no incomplete exportReport() body found
    braces: 0 open, 0 close
    parentheses: 1 open, 1 close
    brackets: 0 open, 0 close
    wrote app.js
    ");
}

#[test]
fn serve_fails_when_port_is_taken() {
    let dir = tempdir().expect("tempdir should work");
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").expect("bind should work");
    let port = occupied.local_addr().expect("addr").port().to_string();

    sitekit()
        .args([
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            port.as_str(),
            "--no-open",
            "--dir",
            dir.path().to_str().expect("path utf8"),
        ])
        .assert()
        .failure()
        .stderr(contains("failed binding web server"));
}

#[test]
fn serve_rejects_missing_root() {
    let dir = tempdir().expect("tempdir should work");
    let missing = dir.path().join("missing");

    sitekit()
        .args([
            "serve",
            "--port",
            "0",
            "--no-open",
            "--dir",
            missing.to_str().expect("path utf8"),
        ])
        .assert()
        .failure()
        .stderr(contains("failed resolving web root directory"));
}

#[test]
fn serve_open_flags_conflict() {
    sitekit()
        .args(["serve", "--open", "--no-open"])
        .assert()
        .code(2)
        .stderr(contains("cannot be used with"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = tempdir().expect("tempdir should work");
    fs::write(dir.path().join("sitekit.json"), "{\n  \"port\":\n").expect("write should work");
    let views = dir.path().join("js").join("views");
    fs::create_dir_all(&views).expect("mkdir should work");
    fs::write(views.join("zero-trust-executive-platform.js"), "run();\n")
        .expect("write should work");

    sitekit()
        .arg("fix")
        .current_dir(dir.path())
        .assert()
        .success()
        .stderr(contains("warning: ignoring config").and(contains("failed parsing config file")))
        .stdout(contains("wrote js/views/zero-trust-executive-platform.js"));
}

#[test]
fn fix_explicit_path_ignores_broken_config() {
    let dir = tempdir().expect("tempdir should work");
    fs::write(dir.path().join("sitekit.json"), "{ nope").expect("write should work");
    fs::write(dir.path().join("app.js"), "a {\n").expect("write should work");

    sitekit()
        .args(["fix", "app.js"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("appended 1 closing brace(s)"));

    assert_eq!(fs::read_to_string(dir.path().join("app.js")).expect("read"), "a {\n}\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("app.js.backup")).expect("backup should exist"),
        "a {\n"
    );
}

#[test]
fn fix_with_missing_explicit_config_still_repairs() {
    let dir = tempdir().expect("tempdir should work");
    fs::write(dir.path().join("app.js"), "go();\n").expect("write should work");

    sitekit()
        .args(["fix", "app.js", "--config", "absent.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stderr(contains("warning: ignoring config"))
        .stdout(contains("wrote app.js"));
}

#[cfg(unix)]
#[test]
fn serve_stops_cleanly_on_interrupt() {
    use std::io::{BufRead, BufReader, Read};
    use std::process::{Command as StdCommand, Stdio};

    let dir = tempdir().expect("tempdir should work");
    let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin!("sitekit"))
        .args([
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "0",
            "--no-open",
            "--no-progress",
            "--dir",
            dir.path().to_str().expect("path utf8"),
        ])
        .env_remove("SITEKIT_PORT")
        .env_remove("SITEKIT_HOST")
        .env_remove("SITEKIT_ROOT")
        .env_remove("SITEKIT_PROGRESS")
        .stdout(Stdio::piped())
        .spawn()
        .expect("server should start");

    let mut stdout = BufReader::new(child.stdout.take().expect("stdout is piped"));
    let mut line = String::new();
    loop {
        line.clear();
        let read = stdout.read_line(&mut line).expect("stdout should be readable");
        assert!(read > 0, "server exited before it was ready");
        if line.starts_with("press Ctrl+C") {
            break;
        }
    }

    let status = StdCommand::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("kill should run");
    assert!(status.success());

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).expect("stdout should be readable");
    let exit = child.wait().expect("server should exit");
    assert!(exit.success(), "exit status was {exit}");
    assert!(rest.contains("server stopped"), "stdout after interrupt: {rest:?}");
}
