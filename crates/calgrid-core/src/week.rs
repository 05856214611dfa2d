use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

use crate::calmath::{
  self,
  WEEK_START
};
use crate::clock::MINUTES_PER_HOUR;
use crate::config::{
  LayoutConfig,
  WeekConfig
};
use crate::event::{
  self,
  Event,
  EventStyle,
  SkippedEvent,
  TimeWindow,
  tooltip
};
use crate::select::SelectionHandler;

pub const HOURS_PER_DAY: u32 = 24;

/// How events in one day column are
/// grouped into side-by-side buckets.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Bucketing {
  /// Only events with identical start and
  /// end times share a bucket.
  #[default]
  Exact,
  /// Events whose windows intersect,
  /// directly or through a chain of other
  /// events, share a bucket.
  Overlap
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourSlot {
  pub hour:  u32,
  pub label: String
}

/// An event block with its geometry inside
/// a day column. Vertical values are in
/// rem, horizontal values in percent of the
/// column width.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedEvent {
  pub event:       Event,
  pub window:      TimeWindow,
  pub top:         f64,
  pub height:      f64,
  pub width:       f64,
  pub left:        f64,
  pub start_label: String,
  pub tooltip:     String,
  pub style:       EventStyle
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn {
  pub date:     NaiveDate,
  /// Header text such as `Fri, Mar 15`.
  pub label:    String,
  pub is_today: bool,
  pub slots:    Vec<HourSlot>,
  pub events:   Vec<PositionedEvent>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGrid {
  pub start:     NaiveDate,
  pub end:       NaiveDate,
  pub bucketing: Bucketing,
  pub columns:   Vec<DayColumn>,
  pub skipped:   Vec<SkippedEvent>
}

impl WeekGrid {
  #[tracing::instrument(
    skip(events, config),
    fields(events = events.len())
  )]
  pub fn build(
    reference: NaiveDate,
    today: NaiveDate,
    events: &[Event],
    config: &LayoutConfig
  ) -> Self {
    let days = calmath::week_days(
      reference, WEEK_START
    );
    let start = days[0];
    let end = days[days.len() - 1];
    let (valid, skipped) =
      event::validate_in_range(
        events,
        start,
        end,
        Event::window
      );

    let columns = days
      .into_iter()
      .map(|date| {
        let day_events = valid
          .iter()
          .filter(|(event, _)| {
            event.occurs_on(date)
          })
          .copied()
          .collect::<Vec<_>>();
        DayColumn {
          date,
          label: date
            .format("%a, %b %-d")
            .to_string(),
          is_today: date == today,
          slots: hour_slots(),
          events: layout_day(
            day_events,
            &config.week,
            &config.colors.default
          )
        }
      })
      .collect::<Vec<_>>();

    tracing::debug!(
      %start,
      %end,
      bucketing = ?config.week.bucketing,
      placed = columns
        .iter()
        .map(|c| c.events.len())
        .sum::<usize>(),
      skipped = skipped.len(),
      "week grid built"
    );

    Self {
      start,
      end,
      bucketing: config.week.bucketing,
      columns,
      skipped
    }
  }

  #[must_use]
  pub fn column(
    &self,
    date: NaiveDate
  ) -> Option<&DayColumn> {
    self
      .columns
      .iter()
      .find(|column| column.date == date)
  }

  /// Reports a click on the `hour` slot of
  /// the column for `date`.
  pub fn select_slot<H>(
    &self,
    date: NaiveDate,
    hour: u32,
    handler: &mut H
  ) -> bool
  where
    H: SelectionHandler + ?Sized
  {
    if hour >= HOURS_PER_DAY
      || self.column(date).is_none()
    {
      return false;
    }
    tracing::debug!(
      %date,
      hour,
      "week slot selected"
    );
    handler
      .on_cell_or_slot_select(date, hour);
    true
  }

  pub fn select_event<H>(
    &self,
    date: NaiveDate,
    index: usize,
    handler: &mut H
  ) -> bool
  where
    H: SelectionHandler + ?Sized
  {
    let Some(block) = self
      .column(date)
      .and_then(|column| {
        column.events.get(index)
      })
    else {
      return false;
    };
    tracing::debug!(
      %date,
      title = %block.event.title,
      "week event selected"
    );
    handler.on_event_select(&block.event);
    true
  }
}

fn hour_slots() -> Vec<HourSlot> {
  (0..HOURS_PER_DAY)
    .map(|hour| HourSlot {
      hour,
      label: format!("{hour:02}:00")
    })
    .collect()
}

type Placed<'a> = (&'a Event, TimeWindow);

fn layout_day(
  day_events: Vec<Placed<'_>>,
  config: &WeekConfig,
  fallback_color: &str
) -> Vec<PositionedEvent> {
  let buckets = match config.bucketing {
    | Bucketing::Exact => {
      bucket_exact(day_events)
    }
    | Bucketing::Overlap => {
      bucket_overlap(
        day_events,
        config.min_block_minutes
      )
    }
  };

  buckets
    .iter()
    .flat_map(|bucket| {
      layout_bucket(
        bucket,
        config,
        fallback_color
      )
    })
    .collect()
}

/// Groups by identical `(start, end)`,
/// keeping buckets in order of first
/// appearance.
fn bucket_exact(
  day_events: Vec<Placed<'_>>
) -> Vec<Vec<Placed<'_>>> {
  let mut index: HashMap<
    TimeWindow,
    usize
  > = HashMap::new();
  let mut buckets: Vec<Vec<Placed<'_>>> =
    Vec::new();

  for placed in day_events {
    let slot = *index
      .entry(placed.1)
      .or_insert_with(|| {
        buckets.push(Vec::new());
        buckets.len() - 1
      });
    buckets[slot].push(placed);
  }

  buckets
}

/// Sweeps events in start order and starts
/// a new cluster whenever an event begins
/// at or after the furthest end seen so
/// far. Ends are clamped up to the minimum
/// block length, so a zero-length event
/// clusters with whatever it visibly
/// covers. Clusters come out ordered by
/// their earliest input, members in input
/// order.
fn bucket_overlap<'a>(
  day_events: Vec<Placed<'a>>,
  min_block_minutes: u32
) -> Vec<Vec<Placed<'a>>> {
  let span = |window: TimeWindow| {
    let start =
      window.start.minutes_since_midnight();
    let end = window
      .end
      .minutes_since_midnight()
      .max(start + min_block_minutes);
    (start, end)
  };

  let mut order: Vec<usize> =
    (0..day_events.len()).collect();
  order.sort_by_key(|&idx| {
    let window = day_events[idx].1;
    (window.start, window.end)
  });

  let mut clusters: Vec<Vec<usize>> =
    Vec::new();
  let mut cluster_end = None;

  for idx in order {
    let window = day_events[idx].1;
    let (start, end) = span(window);
    let joins =
      match (cluster_end, clusters.last()) {
        | (Some(furthest), Some(current)) => {
          start < furthest
            || (start == furthest
              && current.iter().any(
                |&other| {
                  day_events[other].1
                    == window
                }
              ))
        }
        | _ => false
      };

    if joins
      && let Some(current) =
        clusters.last_mut()
    {
      current.push(idx);
      cluster_end = cluster_end
        .map(|furthest: u32| {
          furthest.max(end)
        });
    } else {
      clusters.push(vec![idx]);
      cluster_end = Some(end);
    }
  }

  for members in &mut clusters {
    members.sort_unstable();
  }
  clusters.sort_by_key(|members| {
    members.first().copied()
  });

  clusters
    .into_iter()
    .map(|members| {
      members
        .into_iter()
        .map(|idx| day_events[idx])
        .collect()
    })
    .collect()
}

fn layout_bucket(
  bucket: &[Placed<'_>],
  config: &WeekConfig,
  fallback_color: &str
) -> Vec<PositionedEvent> {
  let width = 100.0 / bucket.len() as f64;
  let unit = config.hour_height_rem;
  let min_hours =
    f64::from(config.min_block_minutes)
      / f64::from(MINUTES_PER_HOUR);

  bucket
    .iter()
    .enumerate()
    .map(|(idx, (event, window))| {
      let duration_hours =
        window.end.as_hours()
          - window.start.as_hours();
      PositionedEvent {
        event: (*event).clone(),
        window: *window,
        top: window.start.as_hours()
          * unit,
        height: duration_hours
          .max(min_hours)
          * unit,
        width,
        left: idx as f64 * width,
        start_label: window
          .start
          .to_12h(),
        tooltip: tooltip(event, *window),
        style: event.style(fallback_color)
      }
    })
    .collect()
}
