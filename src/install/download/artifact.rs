//! Release artifact naming and URL construction
//!
//! Pure string building: no network or filesystem access happens here.

use std::fmt;

use url::Url;

use super::platform::Platform;
use crate::install::error::InstallError;

/// The only architecture published for the server binary
pub const ARCH: &str = "amd64";

/// `{distribution}-{version}-{platform}-{arch}`, e.g. `roadrunner-2.3.4-linux-amd64`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSignature(String);

impl ArtifactSignature {
    pub fn new(distribution: &str, version: &str, platform: Platform) -> Self {
        Self(format!("{distribution}-{version}-{}-{ARCH}", platform.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds signatures, download URLs and in-archive entry paths for one release repository.
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    release_url: String,
    distribution: String,
}

impl ArtifactLocator {
    /// `release_url` is the repository base, e.g. `https://github.com/org/repo`.
    pub fn new(release_url: impl Into<String>, distribution: impl Into<String>) -> Self {
        let release_url = release_url.into();
        Self {
            release_url: release_url.trim_end_matches('/').to_string(),
            distribution: distribution.into(),
        }
    }

    pub fn distribution(&self) -> &str {
        &self.distribution
    }

    pub fn build_signature(&self, version: &str, platform: Platform) -> ArtifactSignature {
        ArtifactSignature::new(&self.distribution, version, platform)
    }

    /// `<release_url>/releases/download/v<version>/<signature><ext>`
    pub fn build_download_url(
        &self,
        version: &str,
        signature: &ArtifactSignature,
        platform: Platform,
    ) -> Result<Url, InstallError> {
        let raw = format!(
            "{}/releases/download/v{}/{}{}",
            self.release_url,
            version,
            signature,
            platform.archive_format().extension()
        );
        Url::parse(&raw).map_err(|source| InstallError::Url { url: raw, source })
    }

    /// Path of the executable inside the archive: `<signature>/<rr|rr.exe>`
    pub fn entry_path(signature: &ArtifactSignature, platform: Platform) -> String {
        format!("{}/{}", signature, platform.executable_name())
    }
}
