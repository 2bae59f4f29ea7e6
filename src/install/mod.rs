//! RoadRunner installation library
//!
//! Resolves the release artifact for the running platform, downloads it,
//! extracts the `rr` executable and places it on disk. Also seeds the default
//! `.rr.yaml` into a project directory.

pub mod download;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod runners;
pub mod seed;
pub mod version;
pub mod wizard;

// Public exports
pub use download::{ArchiveFormat, ArtifactLocator, ArtifactSignature, Downloader, Platform};
pub use error::{DownloadError, ExtractError, InstallError};
pub use pipeline::{EXECUTABLE_MODE, InstallPipeline, InstalledBinary};
pub use progress::{NoProgress, ProgressObserver, TerminalProgress};
pub use seed::seed_config;
pub use version::{DescriptorFile, EmbeddedDescriptor, StaticVersion, VersionProvider};
