//! Distribution version lookup
//!
//! The version comes from a build descriptor containing a line
//! `RR_VERSION=<version>`. Only the first matching line counts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::install::error::InstallError;

/// Name of the variable holding the version in a descriptor
pub const VERSION_KEY: &str = "RR_VERSION";

/// Descriptor shipped with this build
pub const EMBEDDED_DESCRIPTOR: &str = include_str!("../../rr.version");

static VERSION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RR_VERSION=(.*)$").expect("version pattern is valid"));

/// Supplies the version of the distribution to install
pub trait VersionProvider: Send + Sync {
    fn version(&self) -> Result<String, InstallError>;
}

/// Scan `reader` line by line, stopping at the first version declaration.
pub fn parse_descriptor<R: BufRead>(reader: R, source_name: &str) -> Result<String, InstallError> {
    let not_found = |reason: String| InstallError::VersionNotFound {
        source_name: source_name.to_string(),
        reason,
    };

    for line in reader.lines() {
        let line = line.map_err(|e| not_found(format!("read error: {e}")))?;
        if let Some(captures) = VERSION_LINE.captures(&line) {
            let value = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            if value.is_empty() {
                return Err(not_found(format!("{VERSION_KEY} is declared but empty")));
            }
            return Ok(value.to_string());
        }
    }

    Err(not_found(format!("no {VERSION_KEY}=... line")))
}

/// Reads the version from a descriptor file on disk
#[derive(Debug, Clone)]
pub struct DescriptorFile {
    path: PathBuf,
}

impl DescriptorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VersionProvider for DescriptorFile {
    fn version(&self) -> Result<String, InstallError> {
        let source_name = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|e| InstallError::VersionNotFound {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;
        parse_descriptor(BufReader::new(file), &source_name)
    }
}

/// Reads the version from the descriptor compiled into the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedDescriptor;

impl VersionProvider for EmbeddedDescriptor {
    fn version(&self) -> Result<String, InstallError> {
        parse_descriptor(EMBEDDED_DESCRIPTOR.as_bytes(), "embedded rr.version")
    }
}

/// A version injected directly (command line, tests)
#[derive(Debug, Clone)]
pub struct StaticVersion(pub String);

impl VersionProvider for StaticVersion {
    fn version(&self) -> Result<String, InstallError> {
        let version = self.0.trim();
        if version.is_empty() {
            return Err(InstallError::VersionNotFound {
                source_name: "command line".to_string(),
                reason: "empty version".to_string(),
            });
        }
        Ok(version.to_string())
    }
}
