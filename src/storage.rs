use crate::errors::AppError;
use crate::models::TrackerData;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub async fn load_data(path: &Path) -> TrackerData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<TrackerData>(&bytes) {
            Ok(data) => {
                info!(
                    medications = data.medications.len(),
                    "loaded tracker data from {}",
                    path.display()
                );
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                TrackerData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => TrackerData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            TrackerData::default()
        }
    }
}

/// Writes to a sibling temp file first so a crash never leaves a torn file.
pub async fn persist_data(path: &Path, data: &TrackerData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload).await.map_err(AppError::internal)?;
    fs::rename(&tmp, path).await.map_err(AppError::internal)?;
    Ok(())
}
