//! Binary install pipeline
//!
//! resolve platform → read version → build URL → download → extract →
//! set permissions → verify. Temporary files are `tempfile` guards, so they
//! are removed on every exit path, including early returns and panics.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use super::download::{ArtifactLocator, Downloader, Platform};
use super::error::InstallError;
use super::progress::{NoProgress, ProgressObserver};
use super::version::VersionProvider;
use crate::config::InstallerConfig;

/// Permission bits applied to the installed executable
pub const EXECUTABLE_MODE: u32 = 0o755;

/// A binary that passed post-install verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledBinary {
    pub path: PathBuf,
    pub version: String,
    pub platform: Platform,
    pub size: u64,
    /// Unix permission bits; `None` on platforms without them
    pub mode: Option<u32>,
}

/// Pipeline progress, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstallState {
    Start,
    PlatformResolved,
    VersionKnown,
    UrlBuilt,
    Downloaded,
    Extracted,
    PermissionsSet,
    Verified,
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

struct Transitions(InstallState);

impl Transitions {
    fn advance(&mut self, next: InstallState) {
        debug!("install: {} -> {}", self.0, next);
        self.0 = next;
    }
}

/// Downloads and installs the server binary into a target directory
pub struct InstallPipeline {
    locator: ArtifactLocator,
    downloader: Downloader,
    version: Box<dyn VersionProvider>,
    host_os: Option<String>,
    work_dir: Option<PathBuf>,
    observer: Arc<dyn ProgressObserver>,
}

impl InstallPipeline {
    pub fn new(
        config: &InstallerConfig,
        version: impl VersionProvider + 'static,
    ) -> Result<Self, InstallError> {
        Ok(Self {
            locator: ArtifactLocator::new(&config.release_url, &config.distribution),
            downloader: Downloader::new(config)?,
            version: Box::new(version),
            host_os: None,
            work_dir: None,
            observer: Arc::new(NoProgress),
        })
    }

    /// Override the host OS identifier used for platform resolution
    pub fn with_host_os(mut self, host_os: impl Into<String>) -> Self {
        self.host_os = Some(host_os.into());
        self
    }

    /// Directory for the temporary download (default: current directory)
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Injected host, or the detected one
    pub fn platform(&self) -> Platform {
        match &self.host_os {
            Some(host_os) => Platform::resolve(host_os),
            None => Platform::detect(),
        }
    }

    /// Where the binary lands for `target_dir` (`rr` or `rr.exe`)
    pub fn destination(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(self.platform().executable_name())
    }

    /// Run the whole pipeline.
    ///
    /// Fails with [`InstallError::AlreadyExists`] without touching anything when
    /// the destination exists and `overwrite_confirmed` is false.
    pub async fn install(
        &self,
        target_dir: &Path,
        overwrite_confirmed: bool,
    ) -> Result<InstalledBinary, InstallError> {
        let mut state = Transitions(InstallState::Start);
        let result = self.run(target_dir, overwrite_confirmed, &mut state).await;
        if let Err(e) = &result {
            debug!("install: {} -> Failed ({e})", state.0);
        }
        result
    }

    async fn run(
        &self,
        target_dir: &Path,
        overwrite_confirmed: bool,
        state: &mut Transitions,
    ) -> Result<InstalledBinary, InstallError> {
        let host_os = self.host_os.as_deref().unwrap_or(std::env::consts::OS);
        if !Platform::is_known_host(host_os) {
            warn!("Unrecognised host OS {host_os:?}, assuming linux");
        }
        let platform = self.platform();
        state.advance(InstallState::PlatformResolved);

        let version = self.version.version()?;
        state.advance(InstallState::VersionKnown);
        info!("Installing {} {version} for {platform}", self.locator.distribution());

        if !target_dir.is_dir() {
            return Err(InstallError::io(
                format!("Target directory {}", target_dir.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let destination = self.destination(target_dir);
        let exists = tokio::fs::try_exists(&destination).await.map_err(|e| {
            InstallError::io(format!("Failed to inspect {}", destination.display()), e)
        })?;
        if exists && !overwrite_confirmed {
            return Err(InstallError::AlreadyExists(destination));
        }

        let signature = self.locator.build_signature(&version, platform);
        let url = self
            .locator
            .build_download_url(&version, &signature, platform)?;
        let entry = ArtifactLocator::entry_path(&signature, platform);
        state.advance(InstallState::UrlBuilt);
        info!("Downloading {url}");

        let download = self.download_file(platform)?;
        self.downloader
            .download(&url, download.path(), self.observer.as_ref())
            .await?;
        state.advance(InstallState::Downloaded);

        let staged = tempfile::Builder::new()
            .prefix(".rr-staging-")
            .tempfile_in(target_dir)
            .map_err(|e| {
                InstallError::io(format!("Failed to stage in {}", target_dir.display()), e)
            })?;

        let extractor = platform.archive_format().extractor();
        let archive_path = download.path().to_path_buf();
        let staged_path = staged.path().to_path_buf();
        let written = tokio::task::spawn_blocking(move || {
            extractor.extract_entry(&archive_path, &entry, &staged_path)
        })
        .await??;
        state.advance(InstallState::Extracted);

        if let Err(e) = download.close() {
            warn!("Failed to remove temporary download: {e}");
        }

        set_executable(staged.path())?;
        state.advance(InstallState::PermissionsSet);

        if written == 0 {
            return Err(InstallError::ExtractionVerification(destination));
        }
        staged.persist(&destination).map_err(|e| {
            InstallError::io(format!("Failed to move binary to {}", destination.display()), e.error)
        })?;

        let installed = verify(&destination, version, platform)?;
        state.advance(InstallState::Verified);
        info!(
            "Installed {} ({} bytes)",
            installed.path.display(),
            installed.size
        );
        Ok(installed)
    }

    fn download_file(&self, platform: Platform) -> Result<NamedTempFile, InstallError> {
        let work_dir = match &self.work_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| InstallError::io("Failed to read current directory", e))?,
        };
        tempfile::Builder::new()
            .prefix(".rr-download-")
            .suffix(platform.archive_format().extension())
            .tempfile_in(&work_dir)
            .map_err(|e| {
                InstallError::io(
                    format!("Failed to create temporary file in {}", work_dir.display()),
                    e,
                )
            })
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;

    let perms = std::fs::Permissions::from_mode(EXECUTABLE_MODE);
    std::fs::set_permissions(path, perms)
        .map_err(|e| InstallError::io(format!("Failed to set permissions: {}", path.display()), e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

/// Destination must exist and be non-empty
fn verify(
    destination: &Path,
    version: String,
    platform: Platform,
) -> Result<InstalledBinary, InstallError> {
    let meta = match std::fs::metadata(destination) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => meta,
        _ => return Err(InstallError::ExtractionVerification(destination.to_path_buf())),
    };

    #[cfg(unix)]
    let mode = {
        use std::os::unix::fs::PermissionsExt;
        Some(meta.permissions().mode() & 0o777)
    };
    #[cfg(not(unix))]
    let mode = None;

    Ok(InstalledBinary {
        path: destination.to_path_buf(),
        version,
        platform,
        size: meta.len(),
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::download::extract::tests::{write_tar_gz, write_zip};
    use crate::install::version::StaticVersion;

    fn pipeline(server: &mockito::Server, work: &Path, host: &str) -> InstallPipeline {
        let config = InstallerConfig {
            release_url: format!("{}/roadrunner-server/roadrunner", server.url()),
            ..InstallerConfig::default()
        };
        InstallPipeline::new(&config, StaticVersion("1.0.0".into()))
            .unwrap()
            .with_host_os(host)
            .with_work_dir(work)
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".rr-"))
            .collect()
    }

    #[tokio::test]
    async fn empty_archive_entry_fails_verification() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("a.tar.gz");
        write_tar_gz(&archive, &[("roadrunner-1.0.0-linux-amd64/rr", b"".as_slice())]);

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/roadrunner-server/roadrunner/releases/download/v1.0.0/roadrunner-1.0.0-linux-amd64.tar.gz",
            )
            .with_body(std::fs::read(&archive).unwrap())
            .create_async()
            .await;

        let work = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let err = pipeline(&server, work.path(), "linux")
            .install(target.path(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::ExtractionVerification(_)));
        assert!(!target.path().join("rr").exists());
        assert!(leftovers(work.path()).is_empty());
        assert!(leftovers(target.path()).is_empty());
    }

    #[tokio::test]
    async fn unknown_host_installs_linux_artifact() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("a.tar.gz");
        write_tar_gz(&archive, &[("roadrunner-1.0.0-linux-amd64/rr", b"#!bin".as_slice())]);

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/roadrunner-server/roadrunner/releases/download/v1.0.0/roadrunner-1.0.0-linux-amd64.tar.gz",
            )
            .with_body(std::fs::read(&archive).unwrap())
            .create_async()
            .await;

        let work = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let installed = pipeline(&server, work.path(), "plan9")
            .install(target.path(), false)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(installed.platform, Platform::Linux);
        assert_eq!(installed.path, target.path().join("rr"));
    }

    #[tokio::test]
    async fn darwin_uses_zip_and_overwrites_when_confirmed() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("a.zip");
        write_zip(
            &archive,
            &[("roadrunner-1.0.0-darwin-amd64/rr", b"new binary".as_slice())],
        );

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/roadrunner-server/roadrunner/releases/download/v1.0.0/roadrunner-1.0.0-darwin-amd64.zip",
            )
            .with_body(std::fs::read(&archive).unwrap())
            .create_async()
            .await;

        let work = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        std::fs::write(target.path().join("rr"), b"old").unwrap();

        let installed = pipeline(&server, work.path(), "darwin")
            .install(target.path(), true)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&installed.path).unwrap(), b"new binary");
        assert_eq!(installed.size, 10);
        assert!(leftovers(work.path()).is_empty());
    }

    #[tokio::test]
    async fn missing_target_directory_is_an_error() {
        let server = mockito::Server::new_async().await;
        let work = tempfile::tempdir().unwrap();
        let err = pipeline(&server, work.path(), "linux")
            .install(&work.path().join("nope"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::Io { .. }));
    }

    #[test]
    fn destination_follows_platform() {
        let config = InstallerConfig::default();
        let windows = InstallPipeline::new(&config, StaticVersion("1.0.0".into()))
            .unwrap()
            .with_host_os("windows");
        assert_eq!(windows.destination(Path::new("bin")), Path::new("bin").join("rr.exe"));
    }
}
