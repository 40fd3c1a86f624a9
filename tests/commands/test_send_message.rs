//! Process-level tests for the tg_send binary
//!
//! None of these reach the network: each one fails before a connection is
//! attempted.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;
use tg_send::SessionLock;

fn run_tg_send(dir: &Path, vars: &[(&str, &str)], args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tg_send"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("TG_API_ID")
        .env_remove("TG_API_HASH")
        .env_remove("SESSION_FILE")
        .env_remove("BOT_USERNAME")
        .env_remove("RUST_LOG");
    for (k, v) in vars {
        cmd.env(k, v);
    }
    cmd.args(args).output().expect("run tg_send")
}

#[test]
fn missing_api_id_fails_before_connecting() {
    let temp = tempdir().expect("tempdir");
    let out = run_tg_send(temp.path(), &[("TG_API_HASH", "x")], &["ping"]);

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("TG_API_ID"), "stderr: {stderr}");
    assert!(!temp.path().join(".telethon_test_session").exists());
}

#[test]
fn non_numeric_api_id_fails_before_connecting() {
    let temp = tempdir().expect("tempdir");
    let out = run_tg_send(
        temp.path(),
        &[("TG_API_ID", "not-a-number"), ("TG_API_HASH", "x")],
        &[],
    );

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not-a-number"), "stderr: {stderr}");
    assert!(!temp.path().join(".telethon_test_session").exists());
}

#[test]
fn missing_api_hash_fails() {
    let temp = tempdir().expect("tempdir");
    let out = run_tg_send(temp.path(), &[("TG_API_ID", "1")], &[]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("TG_API_HASH"), "stderr: {stderr}");
}

#[test]
fn locked_session_is_refused() {
    let temp = tempdir().expect("tempdir");
    let session = temp.path().join("busy.session");
    let _held = SessionLock::acquire(&temp.path().join("busy.session.lock")).expect("lock");

    let out = run_tg_send(
        temp.path(),
        &[
            ("TG_API_ID", "1"),
            ("TG_API_HASH", "x"),
            ("SESSION_FILE", session.to_str().expect("utf8 path")),
        ],
        &["ping"],
    );

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("locked"), "stderr: {stderr}");
    assert!(!session.exists());
}

#[test]
fn help_mentions_message_argument() {
    let temp = tempdir().expect("tempdir");
    let out = run_tg_send(temp.path(), &[], &["--help"]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[MESSAGE]"), "stdout: {stdout}");
}

#[test]
fn hyphenated_message_reaches_config_check() {
    let temp = tempdir().expect("tempdir");

    for args in [&["-1 degrees"][..], &["--urgent"][..]] {
        let out = run_tg_send(temp.path(), &[("TG_API_HASH", "x")], args);

        assert_eq!(out.status.code(), Some(1), "args: {args:?}");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("TG_API_ID"), "args: {args:?} stderr: {stderr}");
    }
}

#[test]
fn extra_arguments_are_ignored() {
    let temp = tempdir().expect("tempdir");
    let out = run_tg_send(temp.path(), &[("TG_API_HASH", "x")], &["a", "b", "--c"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("TG_API_ID"), "stderr: {stderr}");
}
