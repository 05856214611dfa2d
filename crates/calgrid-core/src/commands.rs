use std::fs;
use std::io::{
  self,
  IsTerminal,
  Write
};
use std::path::Path;

use anyhow::Context;
use chrono::{
  NaiveDate,
  Utc
};
use serde::Serialize;
use tracing::{
  debug,
  info
};

use crate::calmath;
use crate::cli::{
  Command,
  GlobalCli,
  ViewArgs
};
use crate::clock;
use crate::config::LayoutConfig;
use crate::datetime;
use crate::event::Event;
use crate::month::MonthGrid;
use crate::render::Renderer;
use crate::week::WeekGrid;

#[tracing::instrument(skip_all)]
pub fn dispatch(
  cli: GlobalCli,
  mut config: LayoutConfig
) -> anyhow::Result<()> {
  let tz = datetime::resolve_timezone(
    &config
  );
  let clock_today =
    datetime::today_in(Utc::now(), tz);
  let today = match cli.today.as_deref()
  {
    | Some(raw) => {
      datetime::parse_reference_date(
        raw,
        clock_today
      )
      .context("invalid --today value")?
    }
    | None => clock_today
  };
  debug!(%today, timezone = %tz, "resolved today");

  let renderer = Renderer::new(
    !cli.no_color
      && io::stdout().is_terminal()
  );
  let mut out = io::stdout().lock();

  match cli.command {
    | Command::Month { view, shift } => {
      let reference = calmath::shift_months(
        resolve_reference(&view, today)?,
        shift
      );
      let events = load_events(
        view.events.as_deref()
      )?;
      let grid = MonthGrid::build(
        reference, today, &events, &config
      );
      info!(
        month = %grid.title(),
        cells = grid.cells.len(),
        "rendering month"
      );
      if view.json {
        write_json(&mut out, &grid)?;
      } else {
        renderer
          .write_month(&mut out, &grid)?;
      }
    }
    | Command::Week {
      view,
      shift,
      bucketing
    } => {
      let reference = calmath::add_days(
        resolve_reference(&view, today)?,
        shift
          * calmath::DAYS_PER_WEEK
      );
      if let Some(bucketing) = bucketing {
        config.week.bucketing = bucketing;
      }
      let events = load_events(
        view.events.as_deref()
      )?;
      let grid = WeekGrid::build(
        reference, today, &events, &config
      );
      info!(
        start = %grid.start,
        bucketing = ?grid.bucketing,
        "rendering week"
      );
      if view.json {
        write_json(&mut out, &grid)?;
      } else {
        renderer
          .write_week(&mut out, &grid)?;
      }
    }
    | Command::Time { value } => {
      let formatted =
        clock::format_time12(&value)?;
      writeln!(out, "{formatted}")?;
    }
  }

  Ok(())
}

fn resolve_reference(
  view: &ViewArgs,
  today: NaiveDate
) -> anyhow::Result<NaiveDate> {
  datetime::parse_reference_date(
    &view.date, today
  )
  .context("invalid --date value")
}

#[tracing::instrument]
pub fn load_events(
  path: Option<&Path>
) -> anyhow::Result<Vec<Event>> {
  let Some(path) = path else {
    debug!(
      "no events file given; rendering \
       an empty grid"
    );
    return Ok(Vec::new());
  };

  let raw = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  let events =
    serde_json::from_str::<Vec<Event>>(
      &raw
    )
    .with_context(|| {
      format!(
        "failed to parse events from {}",
        path.display()
      )
    })?;
  info!(
    file = %path.display(),
    count = events.len(),
    "loaded events"
  );
  Ok(events)
}

fn write_json<W, T>(
  out: &mut W,
  value: &T
) -> anyhow::Result<()>
where
  W: Write,
  T: Serialize
{
  serde_json::to_writer_pretty(
    &mut *out, value
  )
  .context("failed to serialize grid")?;
  writeln!(out)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn loads_event_array_from_file() {
    let mut file =
      tempfile::NamedTempFile::new()
        .expect("temp file");
    write!(
      file,
      r#"[
        {{"title": "Standup", "date": "2024-03-15", "startTime": "09:00", "endTime": "09:15"}},
        {{"title": "Retro", "date": "2024-03-15", "startTime": "16:00", "endTime": "17:00", "color": "blue"}}
      ]"#
    )
    .expect("write events");

    let events =
      load_events(Some(file.path()))
        .expect("load events");
    assert_eq!(events.len(), 2);
    assert_eq!(
      events[1].color.as_deref(),
      Some("blue")
    );
  }

  #[test]
  fn missing_events_file_gives_empty_list(
  ) {
    assert!(
      load_events(None)
        .expect("no file")
        .is_empty()
    );
  }

  #[test]
  fn malformed_events_file_is_an_error()
  {
    let mut file =
      tempfile::NamedTempFile::new()
        .expect("temp file");
    write!(file, "{{\"title\": 1}}")
      .expect("write junk");
    let err =
      load_events(Some(file.path()))
        .expect_err("should fail");
    assert!(
      format!("{err:#}")
        .contains("failed to parse events")
    );
  }

  #[test]
  fn grids_serialize_to_json() {
    let day = NaiveDate::from_ymd_opt(
      2024, 3, 15
    )
    .expect("valid date");
    let events = vec![
      Event::new("x", day, "09:00", "10:00"),
      Event::new("y", day, "25:00", "26:00"),
    ];
    let grid = WeekGrid::build(
      day,
      day,
      &events,
      &LayoutConfig::default()
    );
    let mut out = Vec::new();
    write_json(&mut out, &grid)
      .expect("json");
    let value: serde_json::Value =
      serde_json::from_slice(&out)
        .expect("valid json");
    assert_eq!(value["start"], "2024-03-10");
    assert_eq!(
      value["columns"][5]["events"][0]
        ["window"]["start"],
      "09:00"
    );
    assert_eq!(
      value["columns"][5]["events"][0]
        ["style"]["border"],
      "#f97316"
    );
    assert_eq!(
      value["skipped"][0]["error"],
      "hour 25 out of range in `25:00` \
       (expected 0-23)"
    );
  }
}
