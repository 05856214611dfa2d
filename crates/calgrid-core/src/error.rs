//! Validation errors raised while turning raw
//! event input into grid geometry.

use thiserror::Error;

use crate::clock::ClockTime;

/// A single event or time string that could
/// not be placed on a grid.
#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum ValidationError {
  #[error(
    "malformed time `{input}`: expected \
     HH:MM"
  )]
  MalformedTime { input: String },

  #[error(
    "hour {hour} out of range in \
     `{input}` (expected 0-23)"
  )]
  HourOutOfRange {
    input: String,
    hour:  u32
  },

  #[error(
    "minute {minute} out of range in \
     `{input}` (expected 0-59)"
  )]
  MinuteOutOfRange {
    input:  String,
    minute: u32
  },

  #[error(
    "event `{title}` ends at {end} \
     before it starts at {start}"
  )]
  InvertedWindow {
    title: String,
    start: ClockTime,
    end:   ClockTime
  }
}

pub type ValidationResult<T> =
  Result<T, ValidationError>;
