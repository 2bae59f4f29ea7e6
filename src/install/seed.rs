//! Default `.rr.yaml` seeding

use std::path::{Path, PathBuf};

use log::info;

use super::error::InstallError;

/// File name the server looks for in a project directory
pub const CONFIG_FILE_NAME: &str = ".rr.yaml";

/// Default configuration shipped with this build, copied verbatim
pub const DEFAULT_CONFIG: &[u8] = include_bytes!("../../config/.rr.yaml");

/// Path the config would be written to for `target_dir`
pub fn config_destination(target_dir: &Path) -> PathBuf {
    target_dir.join(CONFIG_FILE_NAME)
}

/// Write the bundled config to `<target_dir>/.rr.yaml`.
pub fn seed_config(target_dir: &Path, overwrite_confirmed: bool) -> Result<PathBuf, InstallError> {
    let destination = config_destination(target_dir);
    if destination.exists() && !overwrite_confirmed {
        return Err(InstallError::AlreadyExists(destination));
    }

    std::fs::write(&destination, DEFAULT_CONFIG).map_err(|e| {
        InstallError::io(format!("Failed to write {}", destination.display()), e)
    })?;
    info!("Wrote {}", destination.display());
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_bundled_config_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed_config(dir.path(), false).unwrap();
        assert_eq!(path, dir.path().join(".rr.yaml"));
        assert_eq!(std::fs::read(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn refuses_to_overwrite_without_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".rr.yaml");
        std::fs::write(&path, b"custom: true\n").unwrap();

        let err = seed_config(dir.path(), false).unwrap_err();
        assert!(matches!(err, InstallError::AlreadyExists(ref p) if *p == path));
        assert_eq!(std::fs::read(&path).unwrap(), b"custom: true\n");

        seed_config(dir.path(), true).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = seed_config(&dir.path().join("absent"), false).unwrap_err();
        assert!(matches!(err, InstallError::Io { .. }));
    }
}
