/// Offline reading source backed by an exported device data JSON file
///
/// The file is a MongoDB extended-JSON export of the `devicedatas` collection:
/// ```text
/// [{ "_id": { "$oid": "..." }, "device": { "$oid": "..." },
///    "temperature": 22.5, "humidity": 41.0,
///    "createdAt": { "$date": "2024-05-01T10:00:00.000Z" },
///    "location": { "latitude": 60.1, "longitude": 24.9 } }]
/// ```
use log::debug;
use serde::Deserialize;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::models::{Reading, TimeRange, HUMIDITY, TEMPERATURE};

#[derive(Debug, Deserialize)]
struct ObjectId {
    #[serde(rename = "$oid")]
    oid: String,
}

#[derive(Debug, Deserialize)]
struct ExtendedDate {
    #[serde(rename = "$date")]
    date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceDataRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    device: ObjectId,
    temperature: Option<f64>,
    humidity: Option<f64>,
    created_at: ExtendedDate,
}

impl DeviceDataRecord {
    fn into_reading(self) -> Result<Reading, String> {
        let timestamp = OffsetDateTime::parse(&self.created_at.date, &Rfc3339)
            .map_err(|e| format!("Invalid createdAt '{}': {}", self.created_at.date, e))?;

        let mut reading = Reading::new(self.id.oid, self.device.oid, timestamp);
        if let Some(temperature) = self.temperature {
            reading = reading.with_field(TEMPERATURE, temperature);
        }
        if let Some(humidity) = self.humidity {
            reading = reading.with_field(HUMIDITY, humidity);
        }
        Ok(reading)
    }
}

/// Parse an export and keep the readings of one device inside `range`, oldest first
pub fn parse_readings(json: &str, device_id: &str, range: &TimeRange) -> Result<Vec<Reading>, String> {
    let records: Vec<DeviceDataRecord> =
        serde_json::from_str(json).map_err(|e| format!("Invalid device data file: {}", e))?;
    let total = records.len();

    let mut readings = Vec::new();
    for record in records.into_iter().filter(|r| r.device.oid == device_id) {
        let reading = record.into_reading()?;
        if range.contains(reading.timestamp) {
            readings.push(reading);
        }
    }
    readings.sort_by_key(|reading| reading.timestamp);

    debug!(
        "Kept {} of {} records for device {}",
        readings.len(),
        total,
        device_id
    );
    Ok(readings)
}

pub async fn load_readings(
    path: &Path,
    device_id: &str,
    range: &TimeRange,
) -> Result<Vec<Reading>, String> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_readings(&json, device_id, range)
}
