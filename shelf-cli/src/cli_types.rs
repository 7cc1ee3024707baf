//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shelf-migrate")]
#[command(about = "Import a Kotatsu library into a Mihon backup", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Settings file (default: <config dir>/shelf-migrate/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List categories, sources and mangas in a Kotatsu backup
    List {
        /// Kotatsu backup file to read
        #[arg(value_name = "IN_FILE")]
        kotatsu_backup: PathBuf,
    },

    /// Add the mangas of a Kotatsu backup to a copy of a Mihon backup
    Convert(ConvertArgs),
}

#[derive(Args, Clone)]
pub(crate) struct ConvertArgs {
    /// Kotatsu backup file to read
    #[arg(short, long, value_name = "IN_FILE")]
    pub kotatsu: PathBuf,

    /// Mihon backup to use as the template (left untouched)
    #[arg(short, long, value_name = "IN_FILE")]
    pub mihon: PathBuf,

    /// Mihon backup file to write
    #[arg(short, long, value_name = "OUT_FILE")]
    pub output: PathBuf,

    /// Reject source matches at or above this edit distance
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Prefix for the names of created categories
    #[arg(long)]
    pub prefix: Option<String>,

    /// Show what would be imported without writing the output
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
