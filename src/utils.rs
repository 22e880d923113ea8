/// Utility functions for rounding and time formatting
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description!("[day].[month].[year] - [hour]:[minute]:[second]");
    dt.format(format).unwrap_or_else(|_| dt.to_string())
}

/// Format a timestamp as RFC 3339 for JSON responses
pub fn format_rfc3339(dt: &OffsetDateTime) -> String {
    dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string())
}

/// Convert a time::Duration to whole seconds, negative durations count as zero
pub fn duration_to_seconds(duration: time::Duration) -> u64 {
    duration.whole_seconds().max(0) as u64
}

/// Round to one decimal place, halves away from zero (22.25 -> 22.3, -0.25 -> -0.3)
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(22.346), 22.3);
        assert_eq!(round_one_decimal(22.25), 22.3);
        assert_eq!(round_one_decimal(-0.25), -0.3);
        assert_eq!(round_one_decimal(40.0), 40.0);
    }

    #[test]
    fn test_format_datetime() {
        let dt = datetime!(2024-05-01 09:05:07 UTC);
        assert_eq!(format_datetime(&dt), "01.05.2024 - 09:05:07");
        assert_eq!(format_rfc3339(&dt), "2024-05-01T09:05:07Z");
    }

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(duration_to_seconds(time::Duration::milliseconds(2_500)), 2);
        assert_eq!(duration_to_seconds(time::Duration::seconds(-5)), 0);
    }
}
