//! Binary-level tests of the `relfetch` executable.

use crate::common::{PRODUCT, TestEnv};
use assert_cmd::Command;
use predicates::prelude::*;

fn relfetch_cmd(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("relfetch").unwrap();
    cmd.current_dir(env.work_dir())
        .env("RELFETCH_CONFIG_PATH", env.state_path())
        .env("RELFETCH_PRODUCT", PRODUCT)
        .env("RELFETCH_CHECKPOINT_URL", env.server.checkpoint_template())
        .env("RELFETCH_RELEASES_URL", env.server.releases_template())
        .env("RELFETCH_NO_PROGRESS", "1")
        .env_remove("RUST_LOG");
    for var in relfetch::utils::http::PROXY_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("relfetch")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("relfetch version {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_describes_flags_and_state() {
    Command::cargo_bin("relfetch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--install-path"))
        .stdout(predicate::str::contains("--ver"))
        .stdout(predicate::str::contains("State file:"));
}

#[test]
fn test_unknown_flag_fails() {
    Command::cargo_bin("relfetch").unwrap().arg("--bogus").assert().failure();
}

// The server runs on the runtime's worker threads while the binary blocks this one.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_download_via_binary() {
    let env = TestEnv::new().await;
    env.serve_release("1.7.0", "linux", "amd64", b"bin");

    relfetch_cmd(&env)
        .args(["--os", "linux", "--arch", "amd64", "--ver", "1.7.0", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloading artifact"))
        .stdout(predicate::str::contains("Download complete! artifact 1.7.0 is ready."))
        .stdout(predicate::str::contains("URL:").not());

    assert!(env.work_dir().join("artifact_1.7.0_linux_amd64.zip").exists());
    assert!(env.read_state().contains("version=1.7.0"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unattended_up_to_date_via_binary() {
    let env = TestEnv::new().await;
    env.write_state("version=1.7.0\n");
    env.serve_latest("1.7.0");

    relfetch_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date (version 1.7.0)"));

    assert!(env.archive_requests().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_exits_with_status_one() {
    let env = TestEnv::new().await;

    relfetch_cmd(&env)
        .args(["--os", "linux", "--arch", "amd64", "--ver", "0.0.1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to download archive"))
        .stderr(predicate::str::contains("HTTP 404"))
        .stderr(predicate::str::contains("suggestion"));

    assert!(!env.work_dir().join("artifact_0.0.1_linux_amd64.zip").exists());
}
