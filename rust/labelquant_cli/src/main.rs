mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use tracing::subscriber::set_global_default;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

use crate::cli::{
    Args,
    Commands,
};
use crate::commands::{
    main_run,
    main_scan,
    main_write_template,
};
use crate::error::CliError;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), CliError> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_level()));
    let subscriber = Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE),
        );

    set_global_default(subscriber).expect("Setting default subscriber failed");

    match args.command {
        Some(Commands::WriteTemplate(args)) => main_write_template(args)?,
        Some(Commands::Scan(args)) => main_scan(args)?,
        Some(Commands::Run(args)) => {
            let (config_path, result) = main_run(args)?;
            info!(
                "Configuration at {}, design at {}",
                config_path.display(),
                result.exp_design.display()
            );
        }
        None => {
            println!("No command provided");
        }
    }
    Ok(())
}
