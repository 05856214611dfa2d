pub mod calmath;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod error;
pub mod event;
pub mod month;
pub mod render;
pub mod select;
pub mod week;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

pub use crate::clock::{
  ClockTime,
  format_time12
};
pub use crate::config::LayoutConfig;
pub use crate::error::ValidationError;
pub use crate::event::{
  DEFAULT_EVENT_COLOR,
  Event
};
pub use crate::month::{
  MonthCell,
  MonthGrid
};
pub use crate::select::{
  FnHandler,
  SelectionHandler
};
pub use crate::week::{
  Bucketing,
  DayColumn,
  PositionedEvent,
  WeekGrid
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting calgrid"
  );

  let config = LayoutConfig::load(
    cli.config.as_deref()
  )?;
  debug!(?config, "layout config");

  commands::dispatch(cli, config)?;

  info!("done");
  Ok(())
}
