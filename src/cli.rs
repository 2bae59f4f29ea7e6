use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "RoadRunner binary and config bootstrapper")]
pub struct Args {
    /// Path to installer configuration (TOML)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub sub: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Download the RoadRunner binary for this platform (Exit 0 = installed or skipped)
    GetBinary(GetBinaryArgs),
    /// Write the default .rr.yaml into a project directory
    InitConfig(InitConfigArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GetBinaryArgs {
    /// Directory to place the binary in
    #[arg(long, short = 'l', default_value = ".")]
    pub location: PathBuf,

    /// Overwrite an existing binary without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Skip TLS certificate verification (unsafe; for broken corporate proxies)
    #[arg(long)]
    pub insecure: bool,

    /// Read the version from this descriptor instead of the embedded one
    #[arg(long, conflicts_with = "rr_version")]
    pub version_file: Option<PathBuf>,

    /// Install this exact version
    #[arg(long)]
    pub rr_version: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InitConfigArgs {
    /// Directory to place .rr.yaml in
    #[arg(long, short = 'l', default_value = ".")]
    pub location: PathBuf,

    /// Overwrite an existing .rr.yaml without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn get_binary_defaults_to_current_directory() {
        let args = Args::try_parse_from(["rr-bootstrap", "get-binary"]).unwrap();
        match args.sub {
            Cmd::GetBinary(a) => {
                assert_eq!(a.location, PathBuf::from("."));
                assert!(!a.yes);
                assert!(!a.insecure);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn version_sources_conflict() {
        let res = Args::try_parse_from([
            "rr-bootstrap",
            "get-binary",
            "--version-file",
            "rr.version",
            "--rr-version",
            "2.0.0",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn init_config_takes_location() {
        let args =
            Args::try_parse_from(["rr-bootstrap", "-v", "init-config", "--location", "app"]).unwrap();
        assert!(args.verbose);
        match args.sub {
            Cmd::InitConfig(a) => assert_eq!(a.location, PathBuf::from("app")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
