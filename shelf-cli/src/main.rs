//! shelf-migrate CLI
//!
//! Moves a Kotatsu manga library into a Mihon backup without clobbering the
//! rest of the Mihon configuration.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;

use cli_types::{Cli, Commands};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config, command, ..
    } = cli;

    match command {
        Commands::List { kotatsu_backup } => commands::list::run_list(&kotatsu_backup),
        Commands::Convert(args) => {
            let path = config.unwrap_or_else(shelf_core::settings_path);
            let settings = shelf_core::load_settings(&path)?;
            commands::convert::run_convert(args, settings)
        }
    }
}
