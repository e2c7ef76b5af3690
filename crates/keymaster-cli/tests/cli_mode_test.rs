use std::path::PathBuf;
use std::process::Output;

use serde_json::{Value, json};
use tokio::process::Command;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    assert_ok!(std::fs::create_dir_all(&dir));
    dir
}

async fn run_keymaster(args: &[&str]) -> Output {
    let binary_path = env!("CARGO_BIN_EXE_keymaster");

    Command::new(binary_path)
        .args(args)
        .env_remove("KC_KEYMASTER_URL")
        // Keep a developer's own config file out of the way
        .env("XDG_CONFIG_HOME", scratch_dir("xdg-config"))
        .env("RUST_LOG", "error")
        .output()
        .await
        .expect("Failed to start keymaster binary")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_ok!(serde_json::from_slice(&output.stdout))
}

#[tokio::test]
async fn help_lists_subcommands() {
    let output = run_keymaster(&["--help"]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["ready", "wallet", "id", "credential", "vault", "poll"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[tokio::test]
async fn ready_against_mock_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ready": true })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_keymaster(&["--url", &server.uri(), "ready"]).await;
    assert_eq!(stdout_json(&output), json!(true));
}

#[tokio::test]
async fn id_list_prints_json_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/ids"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ids": ["alice", "bob"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_keymaster(&["id", "list", "--url", &server.uri()]).await;
    assert_eq!(stdout_json(&output), json!(["alice", "bob"]));
}

#[tokio::test]
async fn config_file_supplies_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/registries"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "registries": ["local", "hyperswarm"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config_path = scratch_dir("config-file").join("keymaster.yaml");
    assert_ok!(std::fs::write(
        &config_path,
        format!("url: {}\ntimeout_secs: 5\n", server.uri()),
    ));

    let config_arg = config_path.to_string_lossy().to_string();
    let output = run_keymaster(&["--config", &config_arg, "registries"]).await;
    assert_eq!(stdout_json(&output), json!(["local", "hyperswarm"]));
}

#[tokio::test]
async fn service_error_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/names/ghost"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Unknown name" })),
        )
        .mount(&server)
        .await;

    let output = run_keymaster(&["--url", &server.uri(), "name", "get", "ghost"]).await;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error 404"), "stderr: {stderr}");
}

#[tokio::test]
async fn missing_config_file_fails() {
    let output = run_keymaster(&["--config", "/nonexistent/keymaster.yaml", "ready"]).await;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load config"), "stderr: {stderr}");
}

#[tokio::test]
async fn wait_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ready": false })))
        .expect(2)
        .mount(&server)
        .await;

    let config_path = scratch_dir("wait-retries").join("keymaster.yaml");
    assert_ok!(std::fs::write(
        &config_path,
        format!("url: {}\nwait_interval_secs: 0\n", server.uri()),
    ));

    let config_arg = config_path.to_string_lossy().to_string();
    let output = run_keymaster(&[
        "--config",
        &config_arg,
        "--wait",
        "--max-retries",
        "1",
        "registries",
    ])
    .await;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not ready"), "stderr: {stderr}");
}

#[tokio::test]
async fn wait_then_run_command_once_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ready": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/ids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ids": ["alice"] })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_keymaster(&[
        "--url",
        &server.uri(),
        "--wait",
        "--max-retries",
        "3",
        "id",
        "list",
    ])
    .await;
    assert_eq!(stdout_json(&output), json!(["alice"]));
}
