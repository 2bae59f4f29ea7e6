//! Release artifact resolution, download and extraction
//!
//! ## Module Organization
//!
//! - `platform` - Host OS mapping and archive format selection
//! - `artifact` - Artifact signature and download URL construction
//! - `core` - Streaming HTTP download with progress tracking
//! - `extract` - Entry-scoped extraction from zip and tar.gz archives

mod artifact;
mod core;
pub(crate) mod extract;
mod platform;

// Re-export public API
pub use artifact::{ARCH, ArtifactLocator, ArtifactSignature};
pub use self::core::{DownloadTarget, Downloader};
pub use extract::{ArchiveExtractor, TarGzExtractor, ZipExtractor};
pub use platform::{ArchiveFormat, Platform};
