use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::week::Bucketing;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "calgrid",
    version,
    about = "Lay out month and week calendar grids from an event list"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Layout config file (TOML). Defaults to $CALGRID_CONFIG or the
    /// platform config directory.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Date used for today-highlighting instead of the wall clock.
    #[arg(long = "today", global = true)]
    pub today: Option<String>,

    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the month grid containing a date.
    Month {
        #[command(flatten)]
        view: ViewArgs,

        /// Move the reference date by this many months first.
        #[arg(long = "shift", default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
    },
    /// Print the Sunday-first week containing a date.
    Week {
        #[command(flatten)]
        view: ViewArgs,

        /// Move the reference date by this many weeks first.
        #[arg(long = "shift", default_value_t = 0, allow_hyphen_values = true)]
        shift: i64,

        /// Override the configured bucketing strategy.
        #[arg(long = "overlap", value_enum)]
        bucketing: Option<Bucketing>,
    },
    /// Convert a 24-hour HH:MM time to 12-hour form.
    Time { value: String },
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Reference date: YYYY-MM-DD, today, tomorrow or yesterday.
    #[arg(long = "date", default_value = "today")]
    pub date: String,

    /// JSON array of events.
    #[arg(long = "events")]
    pub events: Option<PathBuf>,

    /// Emit the computed grid as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
