mod cli;
mod config;
mod runner;

use anyhow::{bail, Context};
use clap::Parser;
use iweb_engine::{discover_entries, WordPressClient};
use iweb_logging::iweb_info;

use crate::cli::{Cli, Command};
use crate::runner::{Mode, Runner};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    iweb_logging::initialize(config::log_settings(&cli.options));

    let paths = match &cli.command {
        Command::Entry { file } => vec![file.clone()],
        Command::Blog { root } => discover_entries(root)
            .with_context(|| format!("could not list entries under {}", root.display()))?,
    };
    iweb_info!("{} entries to migrate", paths.len());

    let mode = if cli.options.dry_run {
        Mode::DryRun
    } else {
        let settings = config::client_settings(&cli.options)?;
        Mode::Publish(Box::new(WordPressClient::new(settings)?))
    };
    let runner = Runner::new(mode, cli.options.stop_on_error);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start the async runtime")?;
    let summary = runtime.block_on(runner.run(&paths));

    if summary.failed > 0 {
        bail!("{} of {} entries failed", summary.failed, paths.len());
    }
    Ok(())
}
