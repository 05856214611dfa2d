use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

use crate::event::DEFAULT_EVENT_COLOR;
use crate::week::Bucketing;

pub const CONFIG_FILE_NAME: &str =
  "calgrid.toml";
pub const CONFIG_ENV_VAR: &str =
  "CALGRID_CONFIG";

fn default_max_visible_events() -> usize
{
  3
}

fn default_select_hour() -> u32 {
  9
}

fn default_hour_height_rem() -> f64 {
  4.0
}

fn default_min_block_minutes() -> u32 {
  15
}

fn default_event_color() -> String {
  DEFAULT_EVENT_COLOR.to_string()
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct MonthConfig {
  #[serde(
    default = "default_max_visible_events"
  )]
  pub max_visible_events:  usize,
  /// Hour reported when a whole month
  /// cell is selected.
  #[serde(default = "default_select_hour")]
  pub default_select_hour: u32
}

impl Default for MonthConfig {
  fn default() -> Self {
    Self {
      max_visible_events:
        default_max_visible_events(),
      default_select_hour:
        default_select_hour()
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct WeekConfig {
  #[serde(
    default = "default_hour_height_rem"
  )]
  pub hour_height_rem:   f64,
  /// Floor applied to the height of
  /// zero-length blocks so they stay
  /// visible.
  #[serde(
    default = "default_min_block_minutes"
  )]
  pub min_block_minutes: u32,
  #[serde(default)]
  pub bucketing:         Bucketing
}

impl Default for WeekConfig {
  fn default() -> Self {
    Self {
      hour_height_rem:
        default_hour_height_rem(),
      min_block_minutes:
        default_min_block_minutes(),
      bucketing: Bucketing::default()
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct ColorConfig {
  #[serde(default = "default_event_color")]
  pub default: String
}

impl Default for ColorConfig {
  fn default() -> Self {
    Self {
      default: default_event_color()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct TimeConfig {
  pub timezone: Option<String>
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct LayoutConfig {
  #[serde(default)]
  pub month:  MonthConfig,
  #[serde(default)]
  pub week:   WeekConfig,
  #[serde(default)]
  pub colors: ColorConfig,
  #[serde(default)]
  pub time:   TimeConfig
}

impl LayoutConfig {
  /// Loads the first config found among
  /// the explicit override, the
  /// `CALGRID_CONFIG` variable and the
  /// platform config directory. Falls back
  /// to defaults when none exists.
  #[tracing::instrument]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    if let Some(path) = override_path {
      return Self::load_file(path);
    }

    match resolve_config_path() {
      | Some(path) if path.exists() => {
        Self::load_file(&path)
      }
      | Some(path) => {
        debug!(
          file = %path.display(),
          "config file not found; using defaults"
        );
        Ok(Self::default())
      }
      | None => {
        warn!(
          "no config directory \
           available; using defaults"
        );
        Ok(Self::default())
      }
    }
  }

  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let config = Self::from_toml_str(
      &raw
    )
    .with_context(|| {
      format!(
        "failed to parse {}",
        path.display()
      )
    })?;
    info!(
      file = %path.display(),
      bucketing = ?config.week.bucketing,
      "loaded layout config"
    );
    Ok(config)
  }

  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Self>(raw)?;
    config.sanitize();
    Ok(config)
  }

  fn sanitize(&mut self) {
    if self.month.max_visible_events
      == 0
    {
      warn!(
        "month.max_visible_events must \
         be positive; restoring default"
      );
      self.month.max_visible_events =
        default_max_visible_events();
    }

    if self.month.default_select_hour
      > 23
    {
      self.month.default_select_hour =
        23;
    }

    if !self.week.hour_height_rem.is_finite()
      || self.week.hour_height_rem <= 0.0
    {
      warn!(
        value = self.week.hour_height_rem,
        "week.hour_height_rem must be \
         positive; restoring default"
      );
      self.week.hour_height_rem =
        default_hour_height_rem();
    }

    if self.week.min_block_minutes > 60
    {
      self.week.min_block_minutes = 60;
    }

    if self
      .colors
      .default
      .trim()
      .is_empty()
    {
      self.colors.default =
        default_event_color();
    }
  }
}

fn resolve_config_path()
-> Option<PathBuf> {
  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  dirs::config_dir().map(|dir| {
    dir
      .join("calgrid")
      .join(CONFIG_FILE_NAME)
  })
}
