use std::collections::BTreeMap;

use chrono::{
  Datelike,
  NaiveDate
};
use serde::Serialize;

use crate::calmath::{
  self,
  WEEK_START
};
use crate::config::LayoutConfig;
use crate::event::{
  self,
  Event,
  EventStyle,
  SkippedEvent,
  TimeWindow,
  tooltip
};
use crate::select::SelectionHandler;

/// One visible event inside a month cell.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEntry {
  pub event:       Event,
  pub window:      TimeWindow,
  /// Start time in 12-hour form, shown
  /// under the title.
  pub start_label: String,
  pub tooltip:     String,
  pub style:       EventStyle
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
  pub date:             NaiveDate,
  pub is_current_month: bool,
  pub is_today:         bool,
  pub events:           Vec<MonthEntry>,
  /// Events on this day that did not fit
  /// under the display cap.
  pub hidden_count:     usize,
  pub has_more:         bool
}

impl MonthCell {
  #[must_use]
  pub fn total_events(&self) -> usize {
    self.events.len() + self.hidden_count
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
  pub year:           i32,
  pub month:          u32,
  pub weekday_labels: [&'static str; 7],
  pub cells:          Vec<MonthCell>,
  pub skipped:        Vec<SkippedEvent>,
  #[serde(skip)]
  select_hour:        u32
}

impl MonthGrid {
  /// Lays out the month containing
  /// `reference`, padded with adjacent
  /// month days to whole Sunday-first
  /// weeks.
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
    let (start, end) =
      calmath::month_grid_bounds(
        reference, WEEK_START
      );
    // Cells only list events, so an end
    // before the start still counts here.
    let (valid, skipped) =
      event::validate_in_range(
        events,
        start,
        end,
        Event::parsed_times
      );

    let mut by_day: BTreeMap<
      NaiveDate,
      Vec<(&Event, TimeWindow)>
    > = BTreeMap::new();
    for (event, window) in valid {
      by_day
        .entry(event.date)
        .or_default()
        .push((event, window));
    }

    let cap =
      config.month.max_visible_events;
    let fallback =
      config.colors.default.as_str();
    let span = (end - start).num_days();
    let cells = (0..=span)
      .map(|offset| {
        let date =
          calmath::add_days(start, offset);
        let day_events = by_day
          .get(&date)
          .map(Vec::as_slice)
          .unwrap_or_default();
        let entries = day_events
          .iter()
          .take(cap)
          .map(|(event, window)| {
            MonthEntry {
              event:       (*event).clone(),
              window:      *window,
              start_label: window
                .start
                .to_12h(),
              tooltip:     tooltip(
                event, *window
              ),
              style:       event
                .style(fallback)
            }
          })
          .collect::<Vec<_>>();
        let hidden_count = day_events
          .len()
          .saturating_sub(cap);

        MonthCell {
          date,
          is_current_month: date.month()
            == reference.month()
            && date.year()
              == reference.year(),
          is_today: date == today,
          events: entries,
          hidden_count,
          has_more: hidden_count > 0
        }
      })
      .collect::<Vec<_>>();

    tracing::debug!(
      first = %start,
      last = %end,
      cells = cells.len(),
      skipped = skipped.len(),
      "month grid built"
    );

    Self {
      year: reference.year(),
      month: reference.month(),
      weekday_labels:
        calmath::WEEKDAY_LABELS,
      cells,
      skipped,
      select_hour: config
        .month
        .default_select_hour
    }
  }

  /// Cells grouped into Sunday-first
  /// weeks.
  pub fn weeks(
    &self
  ) -> impl Iterator<Item = &[MonthCell]>
  {
    self.cells.chunks(
      calmath::DAYS_PER_WEEK as usize
    )
  }

  #[must_use]
  pub fn row_count(&self) -> usize {
    self.cells.len()
      / calmath::DAYS_PER_WEEK as usize
  }

  #[must_use]
  pub fn cell(
    &self,
    date: NaiveDate
  ) -> Option<&MonthCell> {
    self
      .cells
      .iter()
      .find(|cell| cell.date == date)
  }

  #[must_use]
  pub fn title(&self) -> String {
    self
      .cells
      .iter()
      .find(|cell| cell.is_current_month)
      .map(|cell| {
        cell.date.format("%B %Y").to_string()
      })
      .unwrap_or_default()
  }

  /// Reports a click on the cell for
  /// `date` using the configured default
  /// hour. Returns false when the date is
  /// not on this grid.
  pub fn select_cell<H>(
    &self,
    date: NaiveDate,
    handler: &mut H
  ) -> bool
  where
    H: SelectionHandler + ?Sized
  {
    if self.cell(date).is_none() {
      return false;
    }
    tracing::debug!(
      %date,
      hour = self.select_hour,
      "month cell selected"
    );
    handler.on_cell_or_slot_select(
      date,
      self.select_hour
    );
    true
  }

  /// Reports a click on the `index`-th
  /// visible event of the cell for
  /// `date`. Event clicks never reach the
  /// cell handler.
  pub fn select_event<H>(
    &self,
    date: NaiveDate,
    index: usize,
    handler: &mut H
  ) -> bool
  where
    H: SelectionHandler + ?Sized
  {
    let Some(entry) = self
      .cell(date)
      .and_then(|cell| {
        cell.events.get(index)
      })
    else {
      return false;
    };
    tracing::debug!(
      %date,
      title = %entry.event.title,
      "month event selected"
    );
    handler.on_event_select(&entry.event);
    true
  }
}
