use crate::clock::Clock;
use crate::models::TrackerData;
use crate::tracker::Tracker;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    /// Where `TrackerData` is written after each change. `None` keeps
    /// everything in memory.
    pub data_path: Option<PathBuf>,
    pub tracker: Arc<Mutex<Tracker>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: TrackerData, clock: Arc<dyn Clock>) -> Self {
        Self::build(Some(data_path), data, clock)
    }

    pub fn in_memory(data: TrackerData, clock: Arc<dyn Clock>) -> Self {
        Self::build(None, data, clock)
    }

    fn build(data_path: Option<PathBuf>, data: TrackerData, clock: Arc<dyn Clock>) -> Self {
        let tracker = Tracker::new(data, clock.today());
        Self {
            data_path,
            tracker: Arc::new(Mutex::new(tracker)),
            clock,
        }
    }
}
