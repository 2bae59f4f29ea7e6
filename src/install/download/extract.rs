//! Entry-scoped archive extraction
//!
//! Pulls exactly one named file out of a `.zip` or `.tar.gz` release archive
//! and streams it to a destination path. Nothing else in the archive touches
//! the disk, and the destination is only created once the entry is found.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use log::debug;
use tar::Archive;
use zip::ZipArchive;
use zip::result::ZipError;

use super::platform::ArchiveFormat;
use crate::install::error::ExtractError;

/// Capability shared by every supported archive format
pub trait ArchiveExtractor {
    /// Copy `entry_path` from `archive_path` to `destination`, returning bytes written.
    fn extract_entry(
        &self,
        archive_path: &Path,
        entry_path: &str,
        destination: &Path,
    ) -> Result<u64, ExtractError>;
}

/// Extractor for `.zip` archives
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

/// Extractor for gzip-compressed tarballs
#[derive(Debug, Default, Clone, Copy)]
pub struct TarGzExtractor;

impl ArchiveFormat {
    /// Extractor implementation for this format
    pub fn extractor(&self) -> &'static (dyn ArchiveExtractor + Send + Sync) {
        match self {
            ArchiveFormat::Zip => &ZipExtractor,
            ArchiveFormat::TarGz => &TarGzExtractor,
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ExtractError + '_ {
    move |source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn open_archive(archive_path: &Path) -> Result<File, ExtractError> {
    File::open(archive_path).map_err(io_err(archive_path))
}

fn copy_to(reader: &mut impl io::Read, destination: &Path) -> Result<u64, ExtractError> {
    let mut out = File::create(destination).map_err(io_err(destination))?;
    let written = io::copy(reader, &mut out).map_err(io_err(destination))?;
    out.sync_all().map_err(io_err(destination))?;
    Ok(written)
}

/// Compare archive paths ignoring `./` prefixes and trailing separators.
fn same_entry(candidate: &Path, wanted: &str) -> bool {
    let normal = |p: &Path| -> PathBuf {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    };
    normal(candidate) == normal(Path::new(wanted))
}

impl ArchiveExtractor for ZipExtractor {
    fn extract_entry(
        &self,
        archive_path: &Path,
        entry_path: &str,
        destination: &Path,
    ) -> Result<u64, ExtractError> {
        let file = open_archive(archive_path)?;
        let zip_err = |source| ExtractError::Zip {
            archive: archive_path.to_path_buf(),
            source,
        };
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(zip_err)?;

        let not_found = || ExtractError::EntryNotFound {
            archive: archive_path.to_path_buf(),
            entry: entry_path.to_string(),
        };

        // Exact lookup first, then a normalised scan for `./`-prefixed names
        let index = match archive.index_for_name(entry_path) {
            Some(index) => index,
            None => {
                let name = archive
                    .file_names()
                    .find(|name| same_entry(Path::new(name), entry_path))
                    .map(str::to_string)
                    .ok_or_else(not_found)?;
                archive.index_for_name(&name).ok_or_else(not_found)?
            }
        };

        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(not_found()),
            Err(source) => return Err(zip_err(source)),
        };
        if entry.is_dir() {
            return Err(not_found());
        }

        let written = copy_to(&mut entry, destination)?;
        debug!("extracted {entry_path} ({written} bytes) from zip");
        Ok(written)
    }
}

impl ArchiveExtractor for TarGzExtractor {
    fn extract_entry(
        &self,
        archive_path: &Path,
        entry_path: &str,
        destination: &Path,
    ) -> Result<u64, ExtractError> {
        let file = open_archive(archive_path)?;
        let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));

        let entries = archive.entries().map_err(io_err(archive_path))?;
        for entry in entries {
            let mut entry = entry.map_err(io_err(archive_path))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let matches = {
                let path = entry.path().map_err(io_err(archive_path))?;
                same_entry(&path, entry_path)
            };
            if matches {
                let written = copy_to(&mut entry, destination)?;
                debug!("extracted {entry_path} ({written} bytes) from tar.gz");
                return Ok(written);
            }
        }

        Err(ExtractError::EntryNotFound {
            archive: archive_path.to_path_buf(),
            entry: entry_path.to_string(),
        })
    }
}
