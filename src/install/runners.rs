//! Command runners for `get-binary` and `init-config`
//!
//! These sit between the CLI and the library: they pick the version source,
//! ask for overwrite confirmation, and render the outcome.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use super::error::InstallError;
use super::pipeline::InstallPipeline;
use super::progress::TerminalProgress;
use super::seed;
use super::version::{DescriptorFile, EmbeddedDescriptor, StaticVersion};
use super::wizard;
use crate::cli::{GetBinaryArgs, InitConfigArgs};
use crate::config::InstallerConfig;

/// Build the pipeline for the version source selected on the command line
fn build_pipeline(args: &GetBinaryArgs, config: &InstallerConfig) -> Result<InstallPipeline> {
    let pipeline = match (&args.rr_version, &args.version_file) {
        (Some(version), _) => InstallPipeline::new(config, StaticVersion(version.clone())),
        (None, Some(path)) => InstallPipeline::new(config, DescriptorFile::new(path)),
        (None, None) => InstallPipeline::new(config, EmbeddedDescriptor),
    }
    .context("Failed to prepare installer")?;

    Ok(pipeline.with_observer(Arc::new(TerminalProgress::new("rr"))))
}

/// Apply command-line overrides on top of the loaded config
fn effective_config(args: &GetBinaryArgs, mut config: InstallerConfig) -> InstallerConfig {
    if args.insecure {
        config.accept_invalid_certs = true;
    }
    config
}

/// Run `get-binary`
pub async fn run_get_binary(args: &GetBinaryArgs, config: InstallerConfig) -> Result<()> {
    let config = effective_config(args, config);
    let pipeline = build_pipeline(args, &config)?;
    let destination = pipeline.destination(&args.location);

    let overwrite = if args.yes {
        true
    } else if destination.exists() {
        if !wizard::confirm_overwrite(&destination)? {
            wizard::show_skipped(&format!("Kept existing {}", destination.display()));
            return Ok(());
        }
        true
    } else {
        false
    };

    let installed = pipeline
        .install(&args.location, overwrite)
        .await
        .with_context(|| format!("Failed to install RoadRunner into {}", args.location.display()))?;

    wizard::show_installed(&installed);
    Ok(())
}

/// Run `init-config`
pub fn run_init_config(args: &InitConfigArgs) -> Result<()> {
    let destination = seed::config_destination(&args.location);

    let overwrite = if args.yes {
        true
    } else if destination.exists() {
        if !wizard::confirm_overwrite(&destination)? {
            wizard::show_skipped(&format!("Kept existing {}", destination.display()));
            return Ok(());
        }
        true
    } else {
        false
    };

    match seed::seed_config(&args.location, overwrite) {
        Ok(path) => {
            info!("Config seeded at {}", path.display());
            wizard::show_success(&format!("Config file written to {}", path.display()));
            Ok(())
        }
        Err(e @ InstallError::AlreadyExists(_)) => {
            Err(anyhow::Error::new(e).context("Re-run with --yes to overwrite"))
        }
        Err(e) => Err(e).context("Failed to write default config"),
    }
}
