use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

use crate::aggregation::AggregationError;

pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";

/// Number of graph points produced when the caller does not ask for a specific count
pub const DEFAULT_POINT_COUNT: u32 = 24;

/// One timestamped sample from a device
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: String,
    pub source_id: String,
    pub timestamp: OffsetDateTime,
    pub fields: BTreeMap<String, f64>,
}

impl Reading {
    pub fn new(id: impl Into<String>, source_id: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Reading {
            id: id.into(),
            source_id: source_id.into(),
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

/// Inclusive time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl TimeRange {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, AggregationError> {
        if end < start {
            return Err(AggregationError::InvalidRequest(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        Ok(TimeRange { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, timestamp: OffsetDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketRequest {
    pub range: TimeRange,
    pub point_count: u32,
    /// Device the readings were queried for, used when the readings carry no id
    pub source_id: Option<String>,
}

impl BucketRequest {
    pub fn new(range: TimeRange) -> Self {
        BucketRequest {
            range,
            point_count: DEFAULT_POINT_COUNT,
            source_id: None,
        }
    }

    pub fn with_point_count(mut self, point_count: u32) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}

/// Averaged values of one non-empty bucket
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePoint {
    pub timestamp: OffsetDateTime,
    pub fields: BTreeMap<String, f64>,
}

impl AggregatePoint {
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphMetadata {
    pub range_start: OffsetDateTime,
    pub range_end: OffsetDateTime,
    pub point_count: usize,
    pub source_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub points: Vec<AggregatePoint>,
    pub metadata: GraphMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let result = TimeRange::new(datetime!(2024-05-01 10:15 UTC), datetime!(2024-05-01 10:00 UTC));
        assert!(matches!(result, Err(AggregationError::InvalidRequest(_))));
    }

    #[test]
    fn test_range_contains_both_ends() {
        let range = TimeRange::new(datetime!(2024-05-01 10:00 UTC), datetime!(2024-05-01 10:15 UTC)).unwrap();
        assert!(range.contains(datetime!(2024-05-01 10:00 UTC)));
        assert!(range.contains(datetime!(2024-05-01 10:15 UTC)));
        assert!(!range.contains(datetime!(2024-05-01 10:15:01 UTC)));
        assert_eq!(range.duration(), Duration::minutes(15));
        assert!(!range.is_degenerate());
    }

    #[test]
    fn test_request_defaults() {
        let at = datetime!(2024-05-01 10:00 UTC);
        let request = BucketRequest::new(TimeRange::new(at, at).unwrap());
        assert_eq!(request.point_count, DEFAULT_POINT_COUNT);
        assert!(request.source_id.is_none());
        assert!(request.range.is_degenerate());
    }

    #[test]
    fn test_reading_fields() {
        let reading = Reading::new("r1", "dev-1", datetime!(2024-05-01 10:00 UTC)).with_field(TEMPERATURE, 22.5);
        assert_eq!(reading.fields.get(TEMPERATURE), Some(&22.5));
        assert_eq!(reading.fields.get(HUMIDITY), None);
    }
}
