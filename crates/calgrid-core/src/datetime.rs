use anyhow::anyhow;
use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use chrono_tz::Tz;

use crate::calmath;
use crate::config::LayoutConfig;

pub const TIMEZONE_ENV_VAR: &str =
  "CALGRID_TIMEZONE";

/// Picks the timezone used to decide what
/// "today" is: `CALGRID_TIMEZONE`, then the
/// `[time]` config section, then UTC.
pub fn resolve_timezone(
  config: &LayoutConfig
) -> Tz {
  let env_value =
    std::env::var(TIMEZONE_ENV_VAR).ok();
  timezone_from_sources(
    env_value.as_deref(),
    config
  )
}

fn timezone_from_sources(
  env_value: Option<&str>,
  config: &LayoutConfig
) -> Tz {
  if let Some(raw) = env_value
    && let Some(tz) =
      parse_timezone(raw, TIMEZONE_ENV_VAR)
  {
    return tz;
  }

  if let Some(raw) =
    config.time.timezone.as_deref()
    && let Some(tz) =
      parse_timezone(raw, "calgrid.toml")
  {
    return tz;
  }

  chrono_tz::UTC
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::debug!(
        source,
        timezone = %trimmed,
        "configured timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[must_use]
pub fn today_in(
  now: DateTime<Utc>,
  tz: Tz
) -> NaiveDate {
  now.with_timezone(&tz).date_naive()
}

/// Parses a reference date given on the
/// command line. Accepts `today`,
/// `tomorrow`, `yesterday` and
/// `YYYY-MM-DD`.
#[tracing::instrument(skip(today))]
pub fn parse_reference_date(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<NaiveDate> {
  let token = input.trim();
  match token
    .to_ascii_lowercase()
    .as_str()
  {
    | "today" => return Ok(today),
    | "tomorrow" => {
      return Ok(calmath::add_days(
        today, 1
      ));
    }
    | "yesterday" => {
      return Ok(calmath::add_days(
        today, -1
      ));
    }
    | _ => {}
  }

  NaiveDate::parse_from_str(
    token, "%Y-%m-%d"
  )
  .map_err(|err| {
    anyhow!(
      "unrecognized date `{input}`: \
       {err}; expected YYYY-MM-DD, \
       today, tomorrow or yesterday"
    )
  })
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn today_depends_on_timezone() {
    let now = Utc
      .with_ymd_and_hms(
        2024, 3, 15, 2, 30, 0
      )
      .single()
      .expect("valid now");
    assert_eq!(
      today_in(now, chrono_tz::UTC),
      ymd(2024, 3, 15)
    );
    assert_eq!(
      today_in(
        now,
        chrono_tz::America::New_York
      ),
      ymd(2024, 3, 14)
    );
  }

  #[test]
  fn parses_keywords_and_iso_dates() {
    let today = ymd(2024, 2, 29);
    assert_eq!(
      parse_reference_date(
        "today", today
      )
      .expect("today"),
      today
    );
    assert_eq!(
      parse_reference_date(
        "Tomorrow", today
      )
      .expect("tomorrow"),
      ymd(2024, 3, 1)
    );
    assert_eq!(
      parse_reference_date(
        "2023-12-31",
        today
      )
      .expect("iso"),
      ymd(2023, 12, 31)
    );
    assert!(
      parse_reference_date(
        "2023-02-30",
        today
      )
      .is_err()
    );
  }

  #[test]
  fn config_timezone_is_used() {
    let mut config =
      LayoutConfig::default();
    config.time.timezone =
      Some("Asia/Tokyo".to_string());
    assert_eq!(
      timezone_from_sources(None, &config),
      chrono_tz::Asia::Tokyo
    );
  }

  #[test]
  fn env_timezone_wins_when_valid() {
    let mut config =
      LayoutConfig::default();
    config.time.timezone =
      Some("Asia/Tokyo".to_string());
    assert_eq!(
      timezone_from_sources(
        Some("Europe/Paris"),
        &config
      ),
      chrono_tz::Europe::Paris
    );
    assert_eq!(
      timezone_from_sources(
        Some("Not/AZone"),
        &config
      ),
      chrono_tz::Asia::Tokyo
    );
    assert_eq!(
      timezone_from_sources(
        Some("  "),
        &LayoutConfig::default()
      ),
      chrono_tz::UTC
    );
  }
}
