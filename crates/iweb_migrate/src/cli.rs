use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use iweb_engine::DEFAULT_API_BASE;

#[derive(Debug, Parser)]
#[command(
    name = "iweb-migrate",
    version,
    about = "Move blog entries from an iWeb site export to WordPress"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Migrate a single entry page
    Entry {
        /// Path to the entry's .html file
        file: PathBuf,
    },
    /// Migrate every entry of an exported site
    Blog {
        /// Directory holding the site's index.html
        root: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct Options {
    /// Target site: a wordpress.com name or a full host
    #[arg(long, global = true)]
    pub site: Option<String>,

    /// OAuth bearer token
    #[arg(long, env = "WP_AUTH_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// REST API root
    #[arg(long, default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    #[arg(long, default_value_t = 10, global = true)]
    pub connect_timeout_secs: u64,

    #[arg(long, default_value_t = 60, global = true)]
    pub request_timeout_secs: u64,

    /// Extract and print entries without contacting the site
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Stop at the first failed entry
    #[arg(long, global = true)]
    pub stop_on_error: bool,

    /// Also write the log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log only to --log-file, not the terminal
    #[arg(long, requires = "log_file", global = true)]
    pub quiet: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}
