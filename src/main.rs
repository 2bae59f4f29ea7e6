use anyhow::Result;
use clap::Parser;
use log::debug;

use rr_bootstrap::cli::{self, Cmd};
use rr_bootstrap::config::InstallerConfig;
use rr_bootstrap::install::{runners, wizard};

fn main() {
    let args = cli::Args::parse();

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(real_main(args)) {
        debug!("{e:?}");
        wizard::show_error(&e);
        std::process::exit(1);
    }
}

async fn real_main(args: cli::Args) -> Result<()> {
    let config = InstallerConfig::load(args.config.as_deref())?;

    match args.sub {
        Cmd::GetBinary(get) => runners::run_get_binary(&get, config).await,
        Cmd::InitConfig(init) => runners::run_init_config(&init),
    }
}
