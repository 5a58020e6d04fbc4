//! End-to-end runs of the orchestrator against a local release server.

use crate::common::{PRODUCT, TestEnv, archive_route, explicit, state_line};
use relfetch::core::FetchError;
use relfetch::installer::RunMode;
use relfetch::runner::{RunOutcome, RunRequest};
use relfetch::test_utils::{StubResponse, release_zip};

#[tokio::test]
async fn test_explicit_version_downloads_archive() {
    let env = TestEnv::new().await;
    let served = release_zip(&[(PRODUCT, b"binary 1.7.0"), ("LICENSE.txt", b"license")]).unwrap();
    env.serve_archive("1.7.0", "linux", "amd64", served.clone());

    let outcome = env.runner().run(&explicit("1.7.0", "linux", "amd64")).await.unwrap();

    let archive = env.work_dir().join("artifact_1.7.0_linux_amd64.zip");
    assert_eq!(
        outcome,
        RunOutcome::Downloaded {
            version: "1.7.0".to_string(),
            archive: archive.clone(),
        }
    );
    assert_eq!(std::fs::read(&archive).unwrap(), served);

    let state = env.read_state();
    assert_eq!(state_line(&state, "version").as_deref(), Some("1.7.0"));
    assert_eq!(state_line(&state, "install").as_deref(), Some("false"));

    // An explicit version never asks the checkpoint service.
    assert_eq!(env.server.requests(), vec![archive_route("1.7.0", "linux", "amd64")]);
}

#[tokio::test]
async fn test_explicit_version_prefix_is_stripped() {
    let env = TestEnv::new().await;
    env.serve_release("1.7.0", "darwin", "arm64", b"bin");

    env.runner().run(&explicit("v1.7.0", "darwin", "arm64")).await.unwrap();

    assert!(env.work_dir().join("artifact_1.7.0_darwin_arm64.zip").exists());
}

#[tokio::test]
async fn test_unattended_up_to_date_skips_download() {
    let env = TestEnv::new().await;
    env.write_state("version=1.7.0\ninstall=false\ninstall_path=\n");
    env.serve_latest("1.7.0");

    let outcome = env.runner().run(&RunRequest::unattended()).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::UpToDate {
            version: "1.7.0".to_string()
        }
    );
    assert!(env.archive_requests().is_empty());
    assert_eq!(env.server.requests(), vec![format!("/v1/check/{PRODUCT}")]);
}

#[tokio::test]
async fn test_unattended_saved_install_reinstalls_same_version() {
    let env = TestEnv::new().await;
    env.write_state(&format!(
        "version=1.7.0\ninstall=true\ninstall_path={}\n",
        env.install_dir().display()
    ));
    env.serve_latest("v1.7.0");

    let os = relfetch::utils::platform::host_os();
    let arch = relfetch::utils::platform::host_arch();
    env.serve_release("1.7.0", &os, &arch, b"reinstalled");
    let binary = env.install_dir().join(env.source().binary_name(&os));
    std::fs::write(&binary, b"stale").unwrap();

    let outcome = env.runner().run(&RunRequest::unattended()).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Installed {
            version: "1.7.0".to_string(),
            destination: binary.clone(),
        }
    );
    assert_eq!(std::fs::read(&binary).unwrap(), b"reinstalled");
    assert_eq!(env.archive_requests(), vec![archive_route("1.7.0", &os, &arch)]);
}

#[tokio::test]
async fn test_unattended_new_version_installs_from_state() {
    let env = TestEnv::new().await;
    env.write_state(&format!(
        "# old header\nversion=1.6.0\ninstall=true\ninstall_path={}\n",
        env.install_dir().display()
    ));
    env.serve_latest("1.7.0");

    let os = relfetch::utils::platform::host_os();
    let arch = relfetch::utils::platform::host_arch();
    env.serve_release("1.7.0", &os, &arch, b"fresh binary");

    let outcome = env.runner().run(&RunRequest::unattended()).await.unwrap();

    let binary = env.install_dir().join(env.source().binary_name(&os));
    assert_eq!(
        outcome,
        RunOutcome::Installed {
            version: "1.7.0".to_string(),
            destination: binary.clone(),
        }
    );
    assert_eq!(std::fs::read(&binary).unwrap(), b"fresh binary");
    assert!(!env.work_dir().join(format!("artifact_1.7.0_{os}_{arch}.zip")).exists());

    let state = env.read_state();
    assert!(!state.contains("old header"));
    assert_eq!(state_line(&state, "version").as_deref(), Some("1.7.0"));
    assert_eq!(state_line(&state, "install").as_deref(), Some("true"));
}

#[tokio::test]
async fn test_explicit_install_to_directory() {
    let env = TestEnv::new().await;
    env.serve_release("1.7.0", "linux", "amd64", b"installed bytes");

    let request = RunRequest {
        install: true,
        install_path: Some(env.install_dir().display().to_string()),
        ..explicit("1.7.0", "linux", "amd64")
    };
    env.runner().run(&request).await.unwrap();

    let binary = env.install_dir().join(PRODUCT);
    assert_eq!(std::fs::read(&binary).unwrap(), b"installed bytes");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    let state = env.read_state();
    assert_eq!(state_line(&state, "install").as_deref(), Some("true"));
    assert_eq!(
        state_line(&state, "install_path"),
        Some(env.install_dir().display().to_string())
    );
}

#[tokio::test]
async fn test_force_reuses_saved_install() {
    let env = TestEnv::new().await;
    env.write_state(&format!(
        "version=1.7.0\ninstall=true\ninstall_path={}\n",
        env.install_dir().display()
    ));
    env.serve_latest("1.7.0");
    env.serve_release("1.7.0", "linux", "amd64", b"forced");

    let request = RunRequest {
        mode: RunMode::Explicit,
        os: Some("linux".to_string()),
        arch: Some("amd64".to_string()),
        force: true,
        quiet: true,
        ..RunRequest::unattended()
    };
    let outcome = env.runner().run(&request).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Installed { .. }));
    assert_eq!(std::fs::read(env.install_dir().join(PRODUCT)).unwrap(), b"forced");
}

#[tokio::test]
async fn test_traversal_archive_aborts_install() {
    let env = TestEnv::new().await;
    let zip = release_zip(&[("../../evil", b"pwned"), (PRODUCT, b"bin")]).unwrap();
    env.serve_archive("1.7.0", "linux", "amd64", zip);

    let request = RunRequest {
        install: true,
        install_path: Some(env.install_dir().display().to_string()),
        ..explicit("1.7.0", "linux", "amd64")
    };
    let err = env.runner().run(&request).await.unwrap_err();

    assert!(err.to_string().contains("Failed to install"));
    match err.downcast_ref::<FetchError>() {
        Some(FetchError::PathTraversal { entry, .. }) => assert_eq!(entry, "../../evil"),
        other => panic!("expected PathTraversal, got {other:?}"),
    }
    assert!(!env.install_dir().join(PRODUCT).exists());
    // State is written once the download succeeded, before installing.
    let state = env.read_state();
    assert_eq!(state_line(&state, "version").as_deref(), Some("1.7.0"));
    assert_eq!(state_line(&state, "install").as_deref(), Some("true"));
}

#[tokio::test]
async fn test_archive_not_found_leaves_no_file() {
    let env = TestEnv::new().await;

    let err = env.runner().run(&explicit("9.9.9", "linux", "amd64")).await.unwrap_err();

    assert!(err.to_string().contains("Failed to download archive"));
    assert!(matches!(
        err.downcast_ref::<FetchError>(),
        Some(FetchError::HttpStatus { status: 404, .. })
    ));
    assert!(!env.work_dir().join("artifact_9.9.9_linux_amd64.zip").exists());
}

#[tokio::test]
async fn test_checkpoint_failures() {
    let env = TestEnv::new().await;
    let check = format!("/v1/check/{PRODUCT}");

    env.server.route(&check, StubResponse::json(r#"{"product":"artifact"}"#));
    let err = env.runner().run(&RunRequest::unattended()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to resolve version"));
    assert!(matches!(err.downcast_ref::<FetchError>(), Some(FetchError::EmptyVersion { .. })));

    env.server.route(&check, StubResponse::json("<html>not json</html>"));
    let err = env.runner().run(&RunRequest::unattended()).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<FetchError>(), Some(FetchError::Decode { .. })));

    env.server.route(&check, StubResponse::status(503));
    let err = env.runner().run(&RunRequest::unattended()).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FetchError>(),
        Some(FetchError::HttpStatus { status: 503, .. })
    ));

    assert!(env.archive_requests().is_empty());
}

#[tokio::test]
async fn test_missing_install_directory_keeps_archive() {
    let env = TestEnv::new().await;
    env.serve_release("1.7.0", "linux", "amd64", b"bin");

    let request = RunRequest {
        install: true,
        install_path: Some(env.temp.path().join("nope").display().to_string()),
        ..explicit("1.7.0", "linux", "amd64")
    };
    let err = env.runner().run(&request).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<FetchError>(), Some(FetchError::Io { .. })));
    assert!(env.work_dir().join("artifact_1.7.0_linux_amd64.zip").exists());
}

#[tokio::test]
async fn test_malformed_state_is_tolerated() {
    let env = TestEnv::new().await;
    env.write_state("this line is junk\ninstall=maybe\nversion=1.7.0\n");
    env.serve_latest("1.7.0");

    let outcome = env.runner().run(&RunRequest::unattended()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::UpToDate { .. }));
}
