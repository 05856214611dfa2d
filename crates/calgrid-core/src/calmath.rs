//! Pure calendar arithmetic shared by the
//! month and week grid builders.

use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Weekday
};

pub const DAYS_PER_WEEK: i64 = 7;

/// Grids in this crate always start their
/// rows on Sunday.
pub const WEEK_START: Weekday =
  Weekday::Sun;

pub const WEEKDAY_LABELS: [&str; 7] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat"
];

#[must_use]
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

#[must_use]
pub fn first_day_of_month(
  date: NaiveDate
) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

#[must_use]
pub fn last_day_of_month(
  date: NaiveDate
) -> NaiveDate {
  let first = first_day_of_month(date);
  let next_first = shift_months(first, 1);
  if next_first == first {
    return date;
  }
  add_days(next_first, -1)
}

#[must_use]
pub fn days_in_month(
  date: NaiveDate
) -> u32 {
  last_day_of_month(date).day()
}

/// Zero-based column of `day` in a week
/// that begins on `week_start`.
#[must_use]
pub fn weekday_offset(
  day: NaiveDate,
  week_start: Weekday
) -> i64 {
  let day_idx = day
    .weekday()
    .num_days_from_monday()
    as i64;
  let start_idx = week_start
    .num_days_from_monday()
    as i64;
  (DAYS_PER_WEEK + day_idx - start_idx)
    % DAYS_PER_WEEK
}

#[must_use]
pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  add_days(
    day,
    -weekday_offset(day, week_start)
  )
}

/// The seven consecutive days of the week
/// containing `day`.
#[must_use]
pub fn week_days(
  day: NaiveDate,
  week_start: Weekday
) -> Vec<NaiveDate> {
  let start =
    start_of_week(day, week_start);
  (0..DAYS_PER_WEEK)
    .map(|offset| add_days(start, offset))
    .collect()
}

/// First and last day shown by a month
/// grid: the week start on/before the 1st
/// through the week end on/after the last
/// day of the month.
#[must_use]
pub fn month_grid_bounds(
  reference: NaiveDate,
  week_start: Weekday
) -> (NaiveDate, NaiveDate) {
  let first =
    first_day_of_month(reference);
  let last =
    last_day_of_month(reference);
  let lead =
    weekday_offset(first, week_start);
  let shown = lead
    + i64::from(last.day());
  let rows = (shown + DAYS_PER_WEEK - 1)
    / DAYS_PER_WEEK;
  let total = rows * DAYS_PER_WEEK;
  let start = add_days(first, -lead);
  (start, add_days(start, total - 1))
}

#[must_use]
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let Some(first) =
    NaiveDate::from_ymd_opt(
      year, month, 1
    )
  else {
    return date;
  };
  let (next_year, next_month) =
    if month == 12 {
      (year.saturating_add(1), 1)
    } else {
      (year, month + 1)
    };
  let max_day =
    NaiveDate::from_ymd_opt(
      next_year, next_month, 1
    )
    .map(|next| add_days(next, -1).day())
    .unwrap_or(31);
  first
    .with_day(date.day().min(max_day))
    .unwrap_or(first)
}

#[cfg(test)]
mod tests {
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
  fn month_lengths_include_leap_years() {
    assert_eq!(
      days_in_month(ymd(2024, 2, 10)),
      29
    );
    assert_eq!(
      days_in_month(ymd(2023, 2, 10)),
      28
    );
    assert_eq!(
      days_in_month(ymd(1900, 2, 1)),
      28
    );
    assert_eq!(
      days_in_month(ymd(2000, 2, 1)),
      29
    );
    assert_eq!(
      days_in_month(ymd(2024, 12, 31)),
      31
    );
  }

  #[test]
  fn week_starts_on_sunday() {
    // 2024-03-15 is a Friday.
    assert_eq!(
      start_of_week(
        ymd(2024, 3, 15),
        WEEK_START
      ),
      ymd(2024, 3, 10)
    );
    assert_eq!(
      start_of_week(
        ymd(2024, 3, 10),
        WEEK_START
      ),
      ymd(2024, 3, 10)
    );
    assert_eq!(
      weekday_offset(
        ymd(2024, 3, 16),
        WEEK_START
      ),
      6
    );
  }

  #[test]
  fn week_days_cross_year_boundary() {
    let days = week_days(
      ymd(2025, 1, 1),
      WEEK_START
    );
    assert_eq!(days.len(), 7);
    assert_eq!(days[0], ymd(2024, 12, 29));
    assert_eq!(days[6], ymd(2025, 1, 4));
  }

  #[test]
  fn grid_bounds_pad_to_whole_weeks() {
    // February 2015 starts on Sunday and
    // fills exactly four rows.
    assert_eq!(
      month_grid_bounds(
        ymd(2015, 2, 14),
        WEEK_START
      ),
      (ymd(2015, 2, 1), ymd(2015, 2, 28))
    );
    // March 2024 starts on Friday.
    assert_eq!(
      month_grid_bounds(
        ymd(2024, 3, 15),
        WEEK_START
      ),
      (ymd(2024, 2, 25), ymd(2024, 4, 6))
    );
  }

  #[test]
  fn shift_months_clamps_day() {
    assert_eq!(
      shift_months(ymd(2024, 1, 31), 1),
      ymd(2024, 2, 29)
    );
    assert_eq!(
      shift_months(ymd(2024, 1, 15), -1),
      ymd(2023, 12, 15)
    );
    assert_eq!(
      shift_months(ymd(2024, 11, 30), 14),
      ymd(2026, 1, 30)
    );
  }
}
