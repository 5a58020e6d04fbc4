//! Archive download.
//!
//! [`ArchiveFetcher`] streams a release archive to a local file in the working
//! directory, chunk by chunk, without buffering the body in memory.
//!
//! # Failure Behavior
//!
//! - The response status is checked before the local file is created, so an HTTP
//!   error never leaves an empty archive behind.
//! - A transport error mid-body leaves the partially written file in place; the
//!   next run truncates it.
//! - There is no retry. One attempt per invocation.

use crate::config::ReleaseSource;
use crate::core::FetchError;
use crate::utils::platform::ResolvedTarget;
use crate::utils::progress::DownloadProgress;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// A downloaded archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Where the archive was written
    pub local_path: PathBuf,
    /// Content length announced by the server, if any
    pub total_bytes: Option<u64>,
    /// Bytes actually written
    pub bytes_written: u64,
}

/// Downloads release archives for a [`ReleaseSource`].
pub struct ArchiveFetcher<'a> {
    client: &'a reqwest::Client,
    source: &'a ReleaseSource,
    work_dir: PathBuf,
}

impl<'a> ArchiveFetcher<'a> {
    /// Fetcher writing archives into `work_dir`.
    pub fn new(client: &'a reqwest::Client, source: &'a ReleaseSource, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            source,
            work_dir: work_dir.into(),
        }
    }

    /// Download the archive for `target`.
    ///
    /// Prints the phase to stdout. With `quiet`, the URL and the progress bar
    /// are suppressed.
    pub async fn download(&self, target: &ResolvedTarget, quiet: bool) -> Result<DownloadArtifact, FetchError> {
        let url = self.source.archive_url(&target.version, &target.os, &target.arch);
        let local_path = self
            .source
            .archive_path(&self.work_dir, &target.version, &target.os, &target.arch);

        println!(
            "Downloading {} {} for {}/{}...",
            self.source.product,
            target.version.bold(),
            target.os,
            target.arch
        );
        if !quiet {
            println!("URL: {url}");
        }

        let artifact = self.fetch_to(&url, &local_path, quiet).await?;

        println!("Downloaded to: {}", artifact.local_path.display());
        Ok(artifact)
    }

    /// Stream `url` into `dest`.
    pub async fn fetch_to(&self, url: &str, dest: &Path, quiet: bool) -> Result<DownloadArtifact, FetchError> {
        debug!("GET {url}");
        let mut response = self.client.get(url).send().await.map_err(|e| FetchError::network(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| FetchError::io("create file", dest, e))?;

        let progress = DownloadProgress::new(total_bytes, quiet);
        let mut bytes_written: u64 = 0;

        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    progress.abandon();
                    return Err(FetchError::network(url, &e));
                }
            };

            if let Err(e) = file.write_all(&chunk).await {
                progress.abandon();
                return Err(FetchError::io("write", dest, e));
            }
            bytes_written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }

        file.flush().await.map_err(|e| FetchError::io("flush", dest, e))?;
        progress.finish();

        info!("Wrote {bytes_written} bytes to {}", dest.display());
        Ok(DownloadArtifact {
            local_path: dest.to_path_buf(),
            total_bytes,
            bytes_written,
        })
    }
}
