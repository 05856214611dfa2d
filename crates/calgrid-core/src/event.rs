use std::fmt::Display;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize,
  Serializer
};

use crate::clock::ClockTime;
use crate::error::{
  ValidationError,
  ValidationResult
};

/// Accent color used for events that do
/// not carry their own.
pub const DEFAULT_EVENT_COLOR: &str =
  "#f97316";

/// Alpha suffix appended to an accent
/// color to produce the translucent block
/// background in the week view (`0x33`,
/// roughly 20% opacity).
pub const BACKGROUND_ALPHA_SUFFIX: &str =
  "33";

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  pub title:      String,
  pub date:       NaiveDate,
  pub start_time: String,
  pub end_time:   String,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub color:      Option<String>
}

impl Event {
  pub fn new(
    title: impl Into<String>,
    date: NaiveDate,
    start_time: impl Into<String>,
    end_time: impl Into<String>
  ) -> Self {
    Self {
      title: title.into(),
      date,
      start_time: start_time.into(),
      end_time: end_time.into(),
      color: None
    }
  }

  #[must_use]
  pub fn with_color(
    mut self,
    color: impl Into<String>
  ) -> Self {
    self.color = Some(color.into());
    self
  }

  #[must_use]
  pub fn occurs_on(
    &self,
    day: NaiveDate
  ) -> bool {
    self.date == day
  }

  /// Parses both clock strings without
  /// checking their order.
  pub fn parsed_times(
    &self
  ) -> ValidationResult<TimeWindow> {
    let start = self
      .start_time
      .parse::<ClockTime>()?;
    let end =
      self.end_time.parse::<ClockTime>()?;
    Ok(TimeWindow { start, end })
  }

  /// Parses both clock strings. An end
  /// earlier than the start is rejected; an
  /// empty window (start == end) is allowed.
  pub fn window(
    &self
  ) -> ValidationResult<TimeWindow> {
    let TimeWindow { start, end } =
      self.parsed_times()?;
    if end < start {
      return Err(
        ValidationError::InvertedWindow {
          title: self.title.clone(),
          start,
          end
        }
      );
    }
    Ok(TimeWindow { start, end })
  }

  #[must_use]
  pub fn accent_color<'a>(
    &'a self,
    fallback: &'a str
  ) -> &'a str {
    self
      .color
      .as_deref()
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .unwrap_or(fallback)
  }

  #[must_use]
  pub fn style(
    &self,
    fallback: &str
  ) -> EventStyle {
    let border =
      self.accent_color(fallback);
    EventStyle {
      background: format!(
        "{border}{BACKGROUND_ALPHA_SUFFIX}"
      ),
      border:     border.to_string()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
)]
pub struct TimeWindow {
  pub start: ClockTime,
  pub end:   ClockTime
}

impl TimeWindow {
  #[must_use]
  pub fn duration_minutes(self) -> u32 {
    self
      .end
      .minutes_since_midnight()
      .saturating_sub(
        self.start.minutes_since_midnight()
      )
  }

  /// Half-open overlap: windows that only
  /// touch (`10:00` end, `10:00` start) do
  /// not overlap.
  #[must_use]
  pub fn overlaps(
    self,
    other: TimeWindow
  ) -> bool {
    self.start < other.end
      && other.start < self.end
  }

  /// `"<start> - <end>"` in 12-hour form.
  #[must_use]
  pub fn label(self) -> String {
    format!(
      "{} - {}",
      self.start.to_12h(),
      self.end.to_12h()
    )
  }
}

/// Text shown when hovering an event block.
#[must_use]
pub fn tooltip(
  event: &Event,
  window: TimeWindow
) -> String {
  format!(
    "{} ({})",
    event.title,
    window.label()
  )
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct EventStyle {
  pub background: String,
  pub border:     String
}

/// An event left off the grid because its
/// times did not validate.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEvent {
  pub event: Event,
  #[serde(
    serialize_with = "serialize_display"
  )]
  pub error: ValidationError
}

fn serialize_display<T, S>(
  value: &T,
  serializer: S
) -> Result<S::Ok, S::Error>
where
  T: Display,
  S: Serializer
{
  serializer.collect_str(value)
}

/// Validates the events that fall inside
/// `[first, last]` with `check`, splitting
/// them into placeable events and skipped
/// ones.
pub(crate) fn validate_in_range<'a>(
  events: &'a [Event],
  first: NaiveDate,
  last: NaiveDate,
  check: fn(&Event) -> ValidationResult<TimeWindow>
) -> (
  Vec<(&'a Event, TimeWindow)>,
  Vec<SkippedEvent>
) {
  let mut valid = Vec::new();
  let mut skipped = Vec::new();

  for event in events.iter().filter(|e| {
    e.date >= first && e.date <= last
  }) {
    match check(event) {
      | Ok(window) => {
        valid.push((event, window))
      }
      | Err(error) => {
        tracing::warn!(
          title = %event.title,
          date = %event.date,
          error = %error,
          "skipping event with invalid times"
        );
        skipped.push(SkippedEvent {
          event: event.clone(),
          error
        });
      }
    }
  }

  (valid, skipped)
}
