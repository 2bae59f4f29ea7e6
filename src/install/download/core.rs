//! Streaming HTTP download with progress tracking

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use log::{debug, warn};
use reqwest::redirect::Policy;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use url::Url;

use crate::config::InstallerConfig;
use crate::install::error::DownloadError;
use crate::install::progress::ProgressObserver;

const MAX_REDIRECTS: usize = 10;

/// A finished transfer: the local file plus what was received.
///
/// The file is owned by whoever created the path; the downloader never deletes it.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub path: PathBuf,
    pub received: u64,
    /// Content length reported by the server, if any
    pub total: Option<u64>,
}

/// HTTP(S) downloader that streams the response body straight to disk
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    inactivity_timeout: Duration,
}

impl Downloader {
    pub fn new(config: &InstallerConfig) -> Result<Self, DownloadError> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is DISABLED for release downloads");
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(DownloadError::Client)?;

        Ok(Self {
            client,
            inactivity_timeout: Duration::from_secs(config.inactivity_timeout_secs),
        })
    }

    /// Stream `url` into `destination`, reporting cumulative progress per chunk.
    ///
    /// On failure the partially written file is left in place for the caller to remove.
    pub async fn download(
        &self,
        url: &Url,
        destination: &Path,
        observer: &dyn ProgressObserver,
    ) -> Result<DownloadTarget, DownloadError> {
        debug!("GET {url} -> {}", destination.display());

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: response.url().to_string(),
                status,
            });
        }

        let total = response.content_length().filter(|len| *len > 0);
        let write_err = |source| DownloadError::Write {
            path: destination.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(destination)
            .await
            .map_err(write_err)?;

        let mut received: u64 = 0;
        observer.on_progress(received, total);

        let mut stream = response.bytes_stream();
        loop {
            let chunk = match timeout(self.inactivity_timeout, stream.next()).await {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(source))) => {
                    return Err(DownloadError::Request {
                        url: url.to_string(),
                        source,
                    });
                }
                Ok(None) => break,
                Err(_) => {
                    return Err(DownloadError::Timeout {
                        url: url.to_string(),
                        idle: self.inactivity_timeout,
                        received,
                    });
                }
            };

            file.write_all(&chunk).await.map_err(write_err)?;
            received += chunk.len() as u64;
            observer.on_progress(received, total);
        }

        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        observer.on_finish(received);

        debug!("downloaded {received} bytes from {url}");
        Ok(DownloadTarget {
            path: destination.to_path_buf(),
            received,
            total,
        })
    }
}
