//! Error taxonomy for the binary installer
//!
//! Component errors ([`DownloadError`], [`ExtractError`]) are wrapped into
//! [`InstallError`] unchanged so callers can still match on the cause.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures raised while fetching a release artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server answered {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("no data received for {}s from {url} ({received} bytes so far)", .idle.as_secs())]
    Timeout {
        url: String,
        idle: Duration,
        received: u64,
    },

    #[error("failed to write download to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failures raised while pulling one entry out of an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("entry {entry} not found in {}", .archive.display())]
    EntryNotFound { archive: PathBuf, entry: String },

    #[error("corrupt zip archive {}: {source}", .archive.display())]
    Zip {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level installer error returned by the pipeline and config seeding.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("version not found in {source_name}: {reason}")]
    VersionNotFound { source_name: String, reason: String },

    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("archive does not contain {entry} (release packaging does not match version)")]
    EntryNotFound { entry: String },

    #[error("extraction failed: {0}")]
    Extract(#[source] ExtractError),

    #[error("extracted file {} is missing or empty", .0.display())]
    ExtractionVerification(PathBuf),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid release URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ExtractError> for InstallError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::EntryNotFound { entry, .. } => InstallError::EntryNotFound { entry },
            other => InstallError::Extract(other),
        }
    }
}

impl InstallError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        InstallError::Io {
            context: context.into(),
            source,
        }
    }
}
