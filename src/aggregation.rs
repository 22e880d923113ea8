/// Time-bucketing of raw device readings into evenly spaced graph points
use std::collections::BTreeMap;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::models::{AggregatePoint, AggregateResult, BucketRequest, GraphMetadata, Reading, TimeRange};
use crate::utils::round_one_decimal;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No data available for graph (device '{source_id}')")]
    EmptyInput { source_id: String },
}

impl AggregationError {
    /// HTTP status the calling layer answers with
    pub fn status_code(&self) -> u16 {
        match self {
            AggregationError::InvalidRequest(_) => 400,
            AggregationError::EmptyInput { .. } => 404,
        }
    }
}

/// Running sum and count of one field inside one bucket
#[derive(Debug, Default, Clone, Copy)]
struct FieldSum {
    sum: f64,
    count: u32,
}

impl FieldSum {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Downsample readings into at most `request.point_count` averaged points
///
/// Readings are sorted by time and those outside the request range are dropped.
/// Each remaining reading lands in bucket `floor((t - start) / width)`, clamped to
/// the last bucket so a reading exactly at `range.end` is kept. Every field is
/// averaged independently over the readings that carry a finite value for it and
/// rounded to one decimal place. Buckets without readings are omitted.
///
/// # Errors
/// * `InvalidRequest` - zero point count, inverted range, or a range too long to
///   express in nanoseconds
/// * `EmptyInput` - no reading falls inside the range
pub fn aggregate(
    mut readings: Vec<Reading>,
    request: &BucketRequest,
) -> Result<AggregateResult, AggregationError> {
    if request.point_count < 1 {
        return Err(AggregationError::InvalidRequest(
            "point count must be at least 1".to_string(),
        ));
    }

    let range = TimeRange::new(request.range.start, request.range.end)?;

    let duration_ns = i64::try_from(range.duration().whole_nanoseconds()).map_err(|_| {
        AggregationError::InvalidRequest("time range is too long to bucket".to_string())
    })?;
    // Zero width puts every reading into bucket 0
    let width_ns = if range.is_degenerate() {
        0
    } else {
        duration_ns / i64::from(request.point_count)
    };
    let last_bucket = i64::from(request.point_count) - 1;

    readings.retain(|reading| range.contains(reading.timestamp));
    if readings.is_empty() {
        return Err(AggregationError::EmptyInput {
            source_id: request.source_id.clone().unwrap_or_default(),
        });
    }
    readings.sort_by_key(|reading| reading.timestamp);

    let mut buckets: BTreeMap<i64, BTreeMap<&str, FieldSum>> = BTreeMap::new();
    for reading in &readings {
        let index = bucket_index(reading.timestamp, range.start, width_ns, last_bucket);
        let sums = buckets.entry(index).or_default();
        for (name, value) in &reading.fields {
            if !value.is_finite() {
                continue;
            }
            sums.entry(name.as_str()).or_default().add(*value);
        }
    }

    let points: Vec<AggregatePoint> = buckets
        .into_iter()
        .map(|(index, sums)| AggregatePoint {
            timestamp: range.start + Duration::nanoseconds(index * width_ns),
            fields: sums
                .into_iter()
                .filter_map(|(name, sum)| sum.mean().map(|mean| (name.to_string(), round_one_decimal(mean))))
                .collect(),
        })
        .collect();

    let source_id = match readings.first() {
        Some(reading) if !reading.source_id.is_empty() => reading.source_id.clone(),
        _ => request.source_id.clone().unwrap_or_default(),
    };

    Ok(AggregateResult {
        metadata: GraphMetadata {
            range_start: range.start,
            range_end: range.end,
            point_count: points.len(),
            source_id,
        },
        points,
    })
}

fn bucket_index(timestamp: OffsetDateTime, start: OffsetDateTime, width_ns: i64, last_bucket: i64) -> i64 {
    if width_ns == 0 {
        return 0;
    }
    // Only in-range readings get here, and the range length fits in i64
    let offset_ns = (timestamp - start).whole_nanoseconds();
    debug_assert!(offset_ns >= 0 && offset_ns <= i128::from(i64::MAX));
    let offset_ns = offset_ns as i64;
    (offset_ns / width_ns).clamp(0, last_bucket)
}
