use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use obc_dispatch::cli::{self, Cli};
use obc_dispatch::config::Config;
use obc_dispatch::{logging, version, Database};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    logging::init(&config.log_filter);
    debug!(release = %version::release(), db = %config.db_path.display(), "starting");

    config.prepare()?;
    let mut db = Database::new(config.db_path())
        .with_context(|| format!("opening database {}", config.db_path.display()))?;

    cli::handle_command(cli.command, &mut db, cli.json)?;

    Ok(())
}
