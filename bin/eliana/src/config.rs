use std::collections::HashMap;
use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_SCAN_INTERVAL: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT: u64 = 10;

#[derive(Debug, PartialEq)]
pub struct Config {
    /// Sensor label to its host on the local network.
    pub sensors: HashMap<String, String>,
    pub scan_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let sensors = lookup("SENSORS").ok_or(Error::MissingEnv("SENSORS"))?;
        let sensors: HashMap<String, String> = serde_json::from_str(&sensors)?;

        let scan_interval = parse_secs(&lookup, "SCAN_INTERVAL", DEFAULT_SCAN_INTERVAL)?;
        let request_timeout = parse_secs(&lookup, "REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT)?;

        Ok(Self {
            sensors,
            scan_interval,
            request_timeout,
        })
    }
}

fn parse_secs<F>(lookup: &F, name: &'static str, default: u64) -> Result<Duration>
where
    F: Fn(&'static str) -> Option<String>,
{
    let value = match lookup(name) {
        Some(value) => value,
        None => return Ok(Duration::from_secs(default)),
    };

    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::InvalidEnv(name, value)),
    }
}
