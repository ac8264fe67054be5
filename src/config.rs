use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/medtracker.json";
const DEFAULT_REMINDER_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub reminder_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let data_path = env::var("MEDTRACKER_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        let reminder_secs: u64 =
            try_load("MEDTRACKER_REMINDER_INTERVAL_SECS", DEFAULT_REMINDER_SECS);
        let reminder_secs = if reminder_secs == 0 {
            warn!(
                "MEDTRACKER_REMINDER_INTERVAL_SECS must be positive, using {DEFAULT_REMINDER_SECS}"
            );
            DEFAULT_REMINDER_SECS
        } else {
            reminder_secs
        };

        Self {
            port: try_load("PORT", DEFAULT_PORT),
            data_path,
            reminder_interval: Duration::from_secs(reminder_secs),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("invalid {key} value {raw:?}: {err}, using default {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
