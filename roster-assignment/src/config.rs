//! Shift definitions and per-run settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schedule::slot_utils::{calculate_shift_slots, minutes_to_time_string, minutes_of_day, MINUTES_PER_DAY};

/// Length of one interview slot unless overridden.
pub const DEFAULT_SLOT_MINUTES: u32 = 40;

/// Checks a slot length: at least a minute and no longer than a day.
pub fn validate_slot_minutes(minutes: u32) -> Result<u32, ConfigError> {
    if minutes == 0 || minutes > MINUTES_PER_DAY {
        return Err(ConfigError::SlotDurationOutOfRange(minutes));
    }
    Ok(minutes)
}

/// Default port for `serve`.
pub const DEFAULT_PORT: u16 = 8080;

/// A named scheduling period with its own availability and capacity columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    /// 06:00 - 20:00
    Day,
    /// 20:00 - 06:00, runs past midnight
    Night,
}

impl Shift {
    pub const ALL: [Shift; 2] = [Shift::Day, Shift::Night];

    /// Start and end of the shift as times of day.
    pub fn window(self) -> (NaiveTime, NaiveTime) {
        let (start, end) = match self {
            Shift::Day => (6, 20),
            Shift::Night => (20, 6),
        };
        (
            NaiveTime::from_hms_opt(start, 0, 0).unwrap_or_default(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap_or_default(),
        )
    }

    /// Number of whole slots of `slot_minutes` that fit in the shift
    /// (21 for day and 15 for night at 40 minutes).
    pub fn default_slots(self, slot_minutes: u32) -> u32 {
        let (start, end) = self.window();
        calculate_shift_slots(start, end, slot_minutes).len() as u32
    }

    /// Capitalised name for report headers.
    pub fn title(self) -> &'static str {
        match self {
            Shift::Day => "Day",
            Shift::Night => "Night",
        }
    }

    /// "06:00-20:00" style description of the window.
    pub fn window_label(self) -> String {
        let (start, end) = self.window();
        format!(
            "{}-{}",
            minutes_to_time_string(minutes_of_day(start)),
            minutes_to_time_string(minutes_of_day(end))
        )
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => write!(f, "day"),
            Shift::Night => write!(f, "night"),
        }
    }
}

impl FromStr for Shift {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Shift::Day),
            "night" => Ok(Shift::Night),
            _ => Err(ConfigError::UnknownShift(s.to_string())),
        }
    }
}

/// Report serialisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
}

/// Settings for one run of either allocator, assembled from CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub shift: Shift,
    /// Overrides the shift's default slot count.
    pub slots: Option<u32>,
    pub slot_minutes: u32,
    pub format: OutputFormat,
    /// Report destination; stdout when `None`.
    pub output: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            shift: Shift::Day,
            slots: None,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            format: OutputFormat::Text,
            output: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_slot_minutes(self.slot_minutes)?;
        Ok(())
    }

    /// Slot count to distribute: the override, or the shift default.
    pub fn total_slots(&self) -> u32 {
        self.slots
            .unwrap_or_else(|| self.shift.default_slots(self.slot_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots_per_shift() {
        assert_eq!(Shift::Day.default_slots(DEFAULT_SLOT_MINUTES), 21);
        assert_eq!(Shift::Night.default_slots(DEFAULT_SLOT_MINUTES), 15);
        assert_eq!(Shift::Day.default_slots(60), 14);
    }

    #[test]
    fn test_shift_from_str() {
        assert_eq!("Day".parse::<Shift>(), Ok(Shift::Day));
        assert_eq!(" night ".parse::<Shift>(), Ok(Shift::Night));
        assert_eq!(
            "evening".parse::<Shift>(),
            Err(ConfigError::UnknownShift("evening".to_string()))
        );
    }

    #[test]
    fn test_run_config_total_slots() {
        let mut config = RunConfig::default();
        assert_eq!(config.total_slots(), 21);

        config.shift = Shift::Night;
        assert_eq!(config.total_slots(), 15);

        config.slots = Some(7);
        assert_eq!(config.total_slots(), 7);
    }

    #[test]
    fn test_slot_minutes_bounds() {
        let config = RunConfig {
            slot_minutes: 0,
            ..RunConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SlotDurationOutOfRange(0)));

        let config = RunConfig {
            slot_minutes: 100_000,
            ..RunConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SlotDurationOutOfRange(100_000)));

        assert_eq!(validate_slot_minutes(1), Ok(1));
        assert_eq!(validate_slot_minutes(24 * 60), Ok(24 * 60));
        assert!(validate_slot_minutes(u32::MAX).is_err());
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_window_label() {
        assert_eq!(Shift::Day.window_label(), "06:00-20:00");
        assert_eq!(Shift::Night.window_label(), "20:00-06:00");
    }
}
