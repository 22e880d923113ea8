/// JSON bodies served for the device graph endpoint
use serde::Serialize;

use crate::aggregation::AggregationError;
use crate::models::{AggregateResult, HUMIDITY, TEMPERATURE};
use crate::utils::format_rfc3339;

#[derive(Debug, Serialize, PartialEq)]
pub struct GraphPoint {
    pub timestamp: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub start: String,
    pub end: String,
    pub point_count: usize,
    pub device_id: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GraphResponse {
    pub data: Vec<GraphPoint>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl From<&AggregateResult> for GraphResponse {
    fn from(result: &AggregateResult) -> Self {
        GraphResponse {
            data: result
                .points
                .iter()
                .map(|point| GraphPoint {
                    timestamp: format_rfc3339(&point.timestamp),
                    temperature: point.field(TEMPERATURE),
                    humidity: point.field(HUMIDITY),
                })
                .collect(),
            metadata: ResponseMetadata {
                start: format_rfc3339(&result.metadata.range_start),
                end: format_rfc3339(&result.metadata.range_end),
                point_count: result.metadata.point_count,
                device_id: result.metadata.source_id.clone(),
            },
        }
    }
}

impl From<&AggregationError> for ErrorResponse {
    fn from(err: &AggregationError) -> Self {
        let message = match err {
            AggregationError::EmptyInput { .. } => "No data available for graph".to_string(),
            AggregationError::InvalidRequest(reason) => reason.clone(),
        };
        ErrorResponse {
            status: err.status_code(),
            message,
        }
    }
}

/// Map an aggregation outcome to an HTTP status and JSON body
pub fn render(
    outcome: &Result<AggregateResult, AggregationError>,
) -> Result<(u16, String), serde_json::Error> {
    match outcome {
        Ok(result) => Ok((200, serde_json::to_string(&GraphResponse::from(result))?)),
        Err(err) => {
            let body = ErrorResponse::from(err);
            Ok((body.status, serde_json::to_string(&body)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregate;
    use crate::models::{BucketRequest, Reading, TimeRange};
    use serde_json::{json, Value};
    use time::macros::datetime;

    #[test]
    fn test_render_success_body() {
        let range = TimeRange::new(datetime!(2024-05-01 10:00 UTC), datetime!(2024-05-01 10:15 UTC)).unwrap();
        let readings = vec![
            Reading::new("a", "dev-1", datetime!(2024-05-01 10:00 UTC))
                .with_field(TEMPERATURE, 22.0)
                .with_field(HUMIDITY, 40.0),
            Reading::new("b", "dev-1", datetime!(2024-05-01 10:10 UTC)).with_field(TEMPERATURE, 23.0),
        ];
        let outcome = aggregate(readings, &BucketRequest::new(range).with_point_count(2));
        let (status, body) = render(&outcome).unwrap();

        assert_eq!(status, 200);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "data": [
                    { "timestamp": "2024-05-01T10:00:00Z", "temperature": 22.0, "humidity": 40.0 },
                    { "timestamp": "2024-05-01T10:07:30Z", "temperature": 23.0, "humidity": null }
                ],
                "metadata": {
                    "start": "2024-05-01T10:00:00Z",
                    "end": "2024-05-01T10:15:00Z",
                    "pointCount": 2,
                    "deviceId": "dev-1"
                }
            })
        );
    }

    #[test]
    fn test_render_errors() {
        let empty: Result<AggregateResult, AggregationError> = Err(AggregationError::EmptyInput {
            source_id: "dev-1".to_string(),
        });
        let (status, body) = render(&empty).unwrap();
        assert_eq!(status, 404);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["message"], "No data available for graph");

        let invalid: Result<AggregateResult, AggregationError> =
            Err(AggregationError::InvalidRequest("point count must be at least 1".to_string()));
        let (status, _) = render(&invalid).unwrap();
        assert_eq!(status, 400);
    }
}
