mod check;
mod cli;
mod commands;
mod config;
mod report;
mod store;

use clap::Parser;
use config::{CliOverrides, ResolvedRunConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pixdiff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Init { force } => {
            let root = config::store_root(cli.dir);
            commands::init(&root, force)?;
        }
        cli::Command::Diff {
            reference,
            current,
            output,
            json,
        } => {
            let overrides = CliOverrides {
                dir: cli.dir,
                parallel: None,
            };
            let config = ResolvedRunConfig::new(overrides)?;
            let code = commands::diff(
                &reference,
                &current,
                output.as_deref(),
                json,
                &config.palette,
            )?;
            std::process::exit(code);
        }
        cli::Command::Check {
            filter,
            parallel,
            json,
        } => {
            let overrides = CliOverrides {
                dir: cli.dir,
                parallel,
            };
            let config = ResolvedRunConfig::new(overrides)?;
            let code = commands::check(config, filter.as_deref(), json).await?;
            std::process::exit(code);
        }
        cli::Command::Approve {
            filter,
            new,
            failed,
            all,
        } => {
            let root = config::store_root(cli.dir);
            let store = store::Store::new(root);
            commands::approve(&store, filter.as_deref(), new, failed, all)?;
        }
    }

    Ok(())
}
