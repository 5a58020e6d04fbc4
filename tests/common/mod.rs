//! Common helpers for relfetch integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use relfetch::config::ReleaseSource;
use relfetch::runner::{RunRequest, Runner};
use relfetch::test_utils::{ReleaseServer, StubResponse, release_zip};
use relfetch::utils::http::build_client_with;
use std::path::PathBuf;
use tempfile::TempDir;

/// Product name used by all integration tests.
pub const PRODUCT: &str = "artifact";

/// Isolated working directory, state file and install directory.
pub struct TestEnv {
    pub temp: TempDir,
    pub server: ReleaseServer,
}

impl TestEnv {
    pub async fn new() -> Self {
        relfetch::test_utils::init_test_logging(None);
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("work")).unwrap();
        std::fs::create_dir_all(temp.path().join("bin")).unwrap();
        let server = ReleaseServer::start().await.unwrap();
        Self { temp, server }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.temp.path().join("work")
    }

    pub fn install_dir(&self) -> PathBuf {
        self.temp.path().join("bin")
    }

    pub fn state_path(&self) -> PathBuf {
        self.temp.path().join("relfetch.conf")
    }

    pub fn source(&self) -> ReleaseSource {
        ReleaseSource::new(PRODUCT)
            .with_endpoints(self.server.checkpoint_template(), self.server.releases_template())
    }

    pub fn runner(&self) -> Runner {
        let client = build_client_with(|_| None).unwrap();
        Runner::new(client, self.source(), self.state_path(), self.work_dir())
    }

    /// Serve `version` as the latest release.
    pub fn serve_latest(&self, version: &str) {
        self.server
            .route(format!("/v1/check/{PRODUCT}"), StubResponse::checkpoint(PRODUCT, version));
    }

    /// Serve a release archive containing the product binary.
    pub fn serve_release(&self, version: &str, os: &str, arch: &str, binary: &[u8]) {
        let name = if os == "windows" { format!("{PRODUCT}.exe") } else { PRODUCT.to_string() };
        let zip = release_zip(&[(name.as_str(), binary), ("LICENSE.txt", b"license")]).unwrap();
        self.serve_archive(version, os, arch, zip);
    }

    pub fn serve_archive(&self, version: &str, os: &str, arch: &str, zip: Vec<u8>) {
        self.server.route(archive_route(version, os, arch), StubResponse::bytes(zip));
    }

    pub fn write_state(&self, content: &str) {
        std::fs::write(self.state_path(), content).unwrap();
    }

    pub fn read_state(&self) -> String {
        std::fs::read_to_string(self.state_path()).unwrap()
    }

    pub fn archive_requests(&self) -> Vec<String> {
        self.server.requests().into_iter().filter(|p| p.ends_with(".zip")).collect()
    }
}

pub fn archive_route(version: &str, os: &str, arch: &str) -> String {
    format!("/{PRODUCT}/{version}/{PRODUCT}_{version}_{os}_{arch}.zip")
}

/// A request as `relfetch --os <os> --arch <arch> --ver <version>` would build it.
pub fn explicit(version: &str, os: &str, arch: &str) -> RunRequest {
    RunRequest {
        mode: relfetch::installer::RunMode::Explicit,
        os: Some(os.to_string()),
        arch: Some(arch.to_string()),
        version: Some(version.to_string()),
        quiet: true,
        ..RunRequest::unattended()
    }
}

pub fn state_line(state: &str, key: &str) -> Option<String> {
    state
        .lines()
        .find_map(|l| l.strip_prefix(&format!("{key}=")).map(ToString::to_string))
}
