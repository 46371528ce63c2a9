#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Smoke tests for the `atv` binary: help, config layering and a full
//! login/whoami/logout round against a mock backend.

use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn atv(data_dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_atv"));
    cmd.args(args)
        .env("XDG_DATA_HOME", data_dir)
        .env("HOME", data_dir)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn run(data_dir: &Path, args: &[&str]) -> Output {
    atv(data_dir, args).output().expect("failed to execute atv")
}

fn run_with_stdin(data_dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = atv(data_dir, args)
        .stdin(Stdio::piped())
        .spawn()
        .expect("failed to spawn atv");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["--help"]);

    assert!(output.status.success());
    let out = stdout(&output);
    for word in ["login", "logout", "whoami", "get", "nav", "config", "--config"] {
        assert!(out.contains(word), "help should mention {word}");
    }
}

#[test]
fn test_config_prints_defaults_as_yaml() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["config"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("api_base_url: https://atvrental.muccs.site/api"));
    assert!(out.contains("token_key: authtoken"));
}

#[test]
fn test_config_layers_file_env_and_flags() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("atv.yaml");
    std::fs::write(
        &file,
        "app_name: From File\ndefault_per_page: 24\nstorage_url: https://cdn.example.com/storage\n",
    )
    .unwrap();

    let output = atv(
        dir.path(),
        &[
            "config",
            "--json",
            "-c",
            file.to_str().unwrap(),
            "--api-url",
            "https://api.example.com/v1",
        ],
    )
    .env("ATV__DEFAULT_PER_PAGE", "30")
    .env("ATV__HTTP__USER_AGENT", "smoke/1.0")
    .output()
    .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["app_name"], "From File");
    assert_eq!(value["default_per_page"], 30);
    assert_eq!(value["http"]["user_agent"], "smoke/1.0");
    assert_eq!(value["api_base_url"], "https://api.example.com/v1");
    assert_eq!(value["storage_url"], "https://cdn.example.com/storage");
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["config", "-c", "/nonexistent/atv.yaml"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("config file does not exist"));
}

#[test]
fn test_plain_http_origin_needs_insecure_flag() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["config", "--api-url", "http://localhost:8000/api"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("allow_insecure_http"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_login_whoami_logout_round() {
    let server = MockServer::start();
    let api = server.url("/api");
    let user = json!({
        "id": 7,
        "first_name": "Mara",
        "last_name": "Lind",
        "email": "mara@example.com",
        "role": "manager",
        "avatar": null
    });
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/login")
            .json_body(json!({"email": "mara@example.com", "password": "hunter22"}));
        then.status(200)
            .json_body(json!({"success": true, "data": {"token": "cli-token", "user": user}}));
    });
    let atvs = server.mock(|when, then| {
        when.method(GET)
            .path("/api/atvs")
            .query_param("page", "2")
            .header("authorization", "Bearer cli-token");
        then.status(200).json_body(json!({
            "success": true,
            "data": {"data": [{"id": 1}], "current_page": 2, "last_page": 3}
        }));
    });
    let logout = server.mock(|when, then| {
        when.method(POST)
            .path("/api/logout")
            .header("authorization", "Bearer cli-token");
        then.status(200).json_body(json!({"success": true}));
    });

    let dir = TempDir::new().unwrap();
    let base = ["--insecure", "--api-url", api.as_str()];
    let with = |extra: &[&str]| -> Vec<String> {
        extra
            .iter()
            .chain(base.iter())
            .map(|s| (*s).to_owned())
            .collect()
    };
    fn args(v: &[String]) -> Vec<&str> {
        v.iter().map(String::as_str).collect::<Vec<_>>()
    }

    let login_args = with(&["login", "mara@example.com", "--password-stdin"]);
    let output = run_with_stdin(dir.path(), &args(&login_args), "hunter22\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Signed in as Mara Lind (Manager)"));
    login.assert();

    let whoami_args = with(&["whoami"]);
    let output = run(dir.path(), &args(&whoami_args));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("mara@example.com"));

    let nav_args = with(&["nav"]);
    let out = stdout(&run(dir.path(), &args(&nav_args)));
    assert!(out.contains("nav-manage  shown"));
    assert!(out.contains("nav-admin   hidden"));

    let get_args = with(&["get", "/atvs", "--page", "2"]);
    let output = run(dir.path(), &args(&get_args));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    atvs.assert();
    assert!(stderr(&output).contains("page 2 of 3"));

    let logout_args = with(&["logout", "--yes"]);
    let output = run(dir.path(), &args(&logout_args));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Signed out"));
    logout.assert();

    let out = stdout(&run(dir.path(), &args(&nav_args)));
    assert!(out.contains("nav-guest   shown"));
}
