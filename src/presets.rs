/// Duration presets selectable from the dashboard graph
use log::warn;
use time::{Duration, OffsetDateTime};

use crate::models::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationPreset {
    OneHour,
    #[default]
    Day,
    Week,
    Month,
}

impl DurationPreset {
    /// Parse a preset label; unknown labels fall back to `24h`
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "1h" => DurationPreset::OneHour,
            "24h" => DurationPreset::Day,
            "7d" => DurationPreset::Week,
            "30d" => DurationPreset::Month,
            other => {
                warn!("Unknown duration preset '{}', using 24h", other);
                DurationPreset::Day
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationPreset::OneHour => "1h",
            DurationPreset::Day => "24h",
            DurationPreset::Week => "7d",
            DurationPreset::Month => "30d",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            DurationPreset::OneHour => Duration::hours(1),
            DurationPreset::Day => Duration::hours(24),
            DurationPreset::Week => Duration::days(7),
            DurationPreset::Month => Duration::days(30),
        }
    }

    /// Concrete window `[end - duration, end]`
    pub fn range_ending_at(&self, end: OffsetDateTime) -> TimeRange {
        TimeRange {
            start: end - self.duration(),
            end,
        }
    }
}
