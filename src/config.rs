use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;

use crate::models::DEFAULT_POINT_COUNT;
use crate::presets::DurationPreset;
use crate::sources::ReadingSource;

#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub device_ids: Vec<String>,
    pub source: ReadingSource,
    pub duration: DurationPreset,
    pub point_count: u32,
    /// Seconds between graph refreshes, 0 renders once
    pub refresh_interval_secs: u64,
}

impl GraphConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let device_ids = parse_device_ids(&env::var("DEVICE_IDS").unwrap_or_default());
        if device_ids.is_empty() {
            return Err("No devices configured. Please set DEVICE_IDS to a comma separated list of device ids".into());
        }
        info!("Total devices loaded: {}", device_ids.len());
        for device_id in &device_ids {
            debug!("Device: {}", device_id);
        }

        let source = select_source(
            env::var("READINGS_FILE").ok(),
            env::var("DATABASE_URL").ok(),
        )?;

        let duration = env::var("GRAPH_DURATION")
            .map(|value| DurationPreset::parse(&value))
            .unwrap_or_default();

        let point_count = match env::var("GRAPH_POINTS") {
            Ok(value) => parse_point_count(&value)?,
            Err(_) => DEFAULT_POINT_COUNT,
        };

        let refresh_interval_secs = match env::var("REFRESH_INTERVAL_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("REFRESH_INTERVAL_SECS must be a whole number of seconds, got '{}'", value))?,
            Err(_) => 0,
        };

        Ok(GraphConfig {
            device_ids,
            source,
            duration,
            point_count,
            refresh_interval_secs,
        })
    }
}

/// Split a comma separated id list, dropping blanks and duplicates
pub fn parse_device_ids(value: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|known| known == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

pub fn parse_point_count(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(format!("GRAPH_POINTS must be a positive integer, got '{}'", value)),
    }
}

/// Pick the reading source; a mock data file takes precedence over the database
pub fn select_source(
    readings_file: Option<String>,
    database_url: Option<String>,
) -> Result<ReadingSource, String> {
    let readings_file = readings_file.filter(|path| !path.trim().is_empty());
    let database_url = database_url.filter(|url| !url.trim().is_empty());

    match (readings_file, database_url) {
        (Some(path), database_url) => {
            if database_url.is_some() {
                warn!("Both READINGS_FILE and DATABASE_URL set, using READINGS_FILE");
            }
            Ok(ReadingSource::File {
                path: PathBuf::from(path),
            })
        }
        (None, Some(database_url)) => Ok(ReadingSource::Postgres { database_url }),
        (None, None) => Err("Neither READINGS_FILE nor DATABASE_URL environment variable set".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_ids() {
        assert_eq!(
            parse_device_ids(" dev-1, dev-2,,dev-1 ,"),
            vec!["dev-1".to_string(), "dev-2".to_string()]
        );
        assert!(parse_device_ids("").is_empty());
        assert!(parse_device_ids(" , ").is_empty());
    }

    #[test]
    fn test_parse_point_count() {
        assert_eq!(parse_point_count("24"), Ok(24));
        assert_eq!(parse_point_count(" 100 "), Ok(100));
        assert!(parse_point_count("0").is_err());
        assert!(parse_point_count("-3").is_err());
        assert!(parse_point_count("many").is_err());
    }

    #[test]
    fn test_select_source() {
        let source = select_source(Some("data.json".into()), Some("postgres://db".into())).unwrap();
        assert_eq!(
            source,
            ReadingSource::File {
                path: PathBuf::from("data.json")
            }
        );

        let source = select_source(Some("  ".into()), Some("postgres://db".into())).unwrap();
        assert_eq!(
            source,
            ReadingSource::Postgres {
                database_url: "postgres://db".into()
            }
        );

        assert!(select_source(None, None).is_err());
    }
}
