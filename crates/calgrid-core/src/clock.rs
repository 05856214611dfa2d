use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{
  Serialize,
  Serializer
};

use crate::error::{
  ValidationError,
  ValidationResult
};

pub const MINUTES_PER_HOUR: u32 = 60;

/// Wall-clock time of day with minute
/// precision, as written in event input
/// (`"HH:MM"`, 24-hour).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct ClockTime {
  hour:   u32,
  minute: u32
}

impl ClockTime {
  pub fn new(
    hour: u32,
    minute: u32
  ) -> ValidationResult<Self> {
    let input =
      format!("{hour}:{minute:02}");
    if hour > 23 {
      return Err(
        ValidationError::HourOutOfRange {
          input,
          hour
        }
      );
    }
    if minute >= MINUTES_PER_HOUR {
      return Err(
        ValidationError::MinuteOutOfRange {
          input,
          minute
        }
      );
    }
    Ok(Self { hour, minute })
  }

  #[must_use]
  pub fn hour(self) -> u32 {
    self.hour
  }

  #[must_use]
  pub fn minute(self) -> u32 {
    self.minute
  }

  #[must_use]
  pub fn minutes_since_midnight(
    self
  ) -> u32 {
    self.hour * MINUTES_PER_HOUR
      + self.minute
  }

  /// Fractional hours since midnight,
  /// e.g. 9:30 is `9.5`.
  #[must_use]
  pub fn as_hours(self) -> f64 {
    f64::from(self.hour)
      + f64::from(self.minute)
        / f64::from(MINUTES_PER_HOUR)
  }

  /// 12-hour display form: no leading
  /// zero on the hour, midnight and noon
  /// shown as 12.
  #[must_use]
  pub fn to_12h(self) -> String {
    let suffix = if self.hour >= 12 {
      "PM"
    } else {
      "AM"
    };
    let display_hour =
      match self.hour % 12 {
        | 0 => 12,
        | h => h
      };
    format!(
      "{display_hour}:{:02} {suffix}",
      self.minute
    )
  }
}

fn clock_regex()
-> Option<&'static Regex> {
  static CLOCK_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  CLOCK_RE
    .get_or_init(|| {
      Regex::new(
        r"^(?P<hour>\d{1,2}):(?P<minute>\d{2})$",
      )
      .map_err(|err| {
        tracing::error!(
          error = %err,
          "clock regex failed to compile"
        );
      })
      .ok()
    })
    .as_ref()
}

impl FromStr for ClockTime {
  type Err = ValidationError;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    let malformed = || {
      ValidationError::MalformedTime {
        input: raw.to_string()
      }
    };
    let captures = clock_regex()
      .and_then(|re| {
        re.captures(raw.trim())
      })
      .ok_or_else(malformed)?;

    let hour = captures
      .name("hour")
      .and_then(|m| {
        m.as_str().parse::<u32>().ok()
      })
      .ok_or_else(malformed)?;
    let minute = captures
      .name("minute")
      .and_then(|m| {
        m.as_str().parse::<u32>().ok()
      })
      .ok_or_else(malformed)?;

    Self::new(hour, minute).map_err(
      |err| match err {
        | ValidationError::HourOutOfRange {
          hour,
          ..
        } => {
          ValidationError::HourOutOfRange {
            input: raw.to_string(),
            hour
          }
        }
        | ValidationError::MinuteOutOfRange {
          minute,
          ..
        } => {
          ValidationError::MinuteOutOfRange {
            input: raw.to_string(),
            minute
          }
        }
        | other => other
      }
    )
  }
}

impl fmt::Display for ClockTime {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:02}:{:02}",
      self.hour, self.minute
    )
  }
}

impl Serialize for ClockTime {
  fn serialize<S>(
    &self,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer.collect_str(self)
  }
}

/// Converts a 24-hour `"HH:MM"` string
/// into `"H:MM AM/PM"`.
#[tracing::instrument(level = "trace")]
pub fn format_time12(
  raw: &str
) -> ValidationResult<String> {
  raw
    .parse::<ClockTime>()
    .map(ClockTime::to_12h)
}
