//! Platform detection for archive format selection

use once_cell::sync::OnceCell;
use std::fmt;

/// Release platforms published for the server binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Darwin,
    Linux,
    FreeBsd,
    Windows,
}

/// Container format of a release archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

/// Global cache for host detection (initialized once per run)
static PLATFORM_CACHE: OnceCell<Platform> = OnceCell::new();

impl Platform {
    /// Map a host OS identifier to a release platform.
    ///
    /// Accepts both Rust's `std::env::consts::OS` names and the uname-style
    /// family names, case-insensitively. Anything unrecognised resolves to
    /// [`Platform::Linux`]; use [`Platform::is_known_host`] to tell the two
    /// apart.
    pub fn resolve(host_os: &str) -> Self {
        Self::lookup(host_os).unwrap_or(Platform::Linux)
    }

    /// Whether `host_os` is in the mapping table (as opposed to falling back).
    pub fn is_known_host(host_os: &str) -> bool {
        Self::lookup(host_os).is_some()
    }

    fn lookup(host_os: &str) -> Option<Self> {
        match host_os.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" | "osx" => Some(Platform::Darwin),
            "linux" => Some(Platform::Linux),
            "freebsd" | "bsd" => Some(Platform::FreeBsd),
            "windows" | "win32" | "winnt" => Some(Platform::Windows),
            _ => None,
        }
    }

    /// Detect the running host (cached after first call)
    pub fn detect() -> Self {
        *PLATFORM_CACHE.get_or_init(|| Self::resolve(std::env::consts::OS))
    }

    /// Identifier used in artifact names
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::FreeBsd => "freebsd",
            Platform::Windows => "windows",
        }
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        match self {
            Platform::Linux => ArchiveFormat::TarGz,
            Platform::Darwin | Platform::FreeBsd | Platform::Windows => ArchiveFormat::Zip,
        }
    }

    pub fn executable_suffix(&self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            _ => "",
        }
    }

    /// File name of the server binary on this platform (`rr` or `rr.exe`)
    pub fn executable_name(&self) -> String {
        format!("rr{}", self.executable_suffix())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ArchiveFormat {
    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => ".zip",
            ArchiveFormat::TarGz => ".tar.gz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_hosts_map_to_documented_platforms() {
        let cases = [
            ("linux", Platform::Linux, ArchiveFormat::TarGz, ""),
            ("macos", Platform::Darwin, ArchiveFormat::Zip, ""),
            ("Darwin", Platform::Darwin, ArchiveFormat::Zip, ""),
            ("freebsd", Platform::FreeBsd, ArchiveFormat::Zip, ""),
            ("BSD", Platform::FreeBsd, ArchiveFormat::Zip, ""),
            ("windows", Platform::Windows, ArchiveFormat::Zip, ".exe"),
            ("WINNT", Platform::Windows, ArchiveFormat::Zip, ".exe"),
        ];

        for (host, platform, format, suffix) in cases {
            let resolved = Platform::resolve(host);
            assert_eq!(resolved, platform, "host {host}");
            assert_eq!(resolved.archive_format(), format, "host {host}");
            assert_eq!(resolved.executable_suffix(), suffix, "host {host}");
            assert!(Platform::is_known_host(host));
        }
    }

    #[test]
    fn unknown_host_falls_back_to_linux() {
        for host in ["solaris", "haiku", "", "   ", "plan9"] {
            assert_eq!(Platform::resolve(host), Platform::Linux, "host {host:?}");
            assert!(!Platform::is_known_host(host));
        }
    }

    #[test]
    fn executable_names() {
        assert_eq!(Platform::Windows.executable_name(), "rr.exe");
        assert_eq!(Platform::Darwin.executable_name(), "rr");
        assert_eq!(Platform::Linux.to_string(), "linux");
    }

    #[test]
    fn detect_matches_resolve_of_current_os() {
        assert_eq!(Platform::detect(), Platform::resolve(std::env::consts::OS));
    }
}
