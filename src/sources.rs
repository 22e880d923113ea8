use std::path::PathBuf;

use crate::database::fetch_readings;
use crate::mock_data::load_readings;
use crate::models::{Reading, TimeRange};

/// Where raw readings come from
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingSource {
    Postgres { database_url: String },
    File { path: PathBuf },
}

impl ReadingSource {
    pub async fn readings(&self, device_id: &str, range: &TimeRange) -> Result<Vec<Reading>, String> {
        match self {
            ReadingSource::Postgres { database_url } => {
                fetch_readings(device_id, range, database_url).await
            }
            ReadingSource::File { path } => load_readings(path, device_id, range).await,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ReadingSource::Postgres { .. } => "PostgreSQL".to_string(),
            ReadingSource::File { path } => format!("file {}", path.display()),
        }
    }
}
