use crate::tracker::DEFAULT_GOAL;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/calories.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub default_goal: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any `key -> value` source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: try_load("PORT", lookup("PORT"), DEFAULT_PORT, |_| true),
            data_path: lookup("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            default_goal: try_load("DAILY_GOAL", lookup("DAILY_GOAL"), DEFAULT_GOAL, |goal| {
                goal.is_finite() && *goal >= 0.0
            }),
        }
    }
}

fn try_load<T: FromStr + Display>(
    key: &str,
    raw: Option<String>,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T
where
    T::Err: Display,
{
    let Some(raw) = raw else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        Ok(value) => {
            warn!("{key} value {value} is out of range, using default: {default}");
            default
        }
        Err(err) => {
            warn!("invalid {key} value {raw:?}: {err}, using default: {default}");
            default
        }
    }
}
