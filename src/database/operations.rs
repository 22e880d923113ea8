/// Database queries supplying raw device readings
use crate::database::connection::execute_with_retry;
use crate::models::{Reading, TimeRange, HUMIDITY, TEMPERATURE};

const SELECT_READINGS: &str = "SELECT id::text, device_id, temperature, humidity, created_at
     FROM device_data
     WHERE device_id = $1 AND created_at BETWEEN $2 AND $3
     ORDER BY created_at";

/// Fetch the readings of one device inside a time range
///
/// Temperature and humidity columns are nullable; a NULL value simply
/// leaves that field out of the reading.
///
/// # Arguments
/// * `device_id` - Device whose readings are wanted
/// * `range` - Inclusive time window
/// * `database_url` - PostgreSQL connection string
pub async fn fetch_readings(
    device_id: &str,
    range: &TimeRange,
    database_url: &str,
) -> Result<Vec<Reading>, String> {
    let device_id = device_id.to_string();
    let range = *range;

    execute_with_retry(database_url, move |client| {
        let device_id = device_id.clone();
        async move {
            let rows = client
                .query(SELECT_READINGS, &[&device_id, &range.start, &range.end])
                .await?;

            let mut readings = Vec::with_capacity(rows.len());
            for row in rows {
                let mut reading = Reading::new(
                    row.try_get::<_, String>(0)?,
                    row.try_get::<_, String>(1)?,
                    row.try_get(4)?,
                );
                if let Some(temperature) = row.try_get::<_, Option<f64>>(2)? {
                    reading = reading.with_field(TEMPERATURE, temperature);
                }
                if let Some(humidity) = row.try_get::<_, Option<f64>>(3)? {
                    reading = reading.with_field(HUMIDITY, humidity);
                }
                readings.push(reading);
            }
            Ok(readings)
        }
    })
    .await
}
