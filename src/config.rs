use crate::errors::ConfigError;
use crate::models::CountScope;
use crate::stats::DEFAULT_TREND_MONTHS;
use std::{env, path::PathBuf};

pub const DEFAULT_QUOTA: u32 = 8;
pub const DEFAULT_PORT: u16 = 8080;
const MAX_TREND_MONTHS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub quota: Option<u32>,
    pub scope: CountScope,
    pub trend_months: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/onsite_days.json"),
            port: DEFAULT_PORT,
            quota: Some(DEFAULT_QUOTA),
            scope: CountScope::Month,
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("ONSITE_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }

        config.port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        if let Some(value) = lookup("ONSITE_QUOTA") {
            config.quota = parse_quota(&value)?;
        }

        if let Some(value) = lookup("ONSITE_COUNT_SCOPE") {
            config.scope = match value.trim() {
                "month" => CountScope::Month,
                "all" | "all_time" => CountScope::AllTime,
                other => return Err(invalid("ONSITE_COUNT_SCOPE", other.to_string())),
            };
        }

        if let Some(value) = lookup("ONSITE_TREND_MONTHS") {
            config.trend_months = match value.trim().parse::<usize>() {
                Ok(months) if (1..=MAX_TREND_MONTHS).contains(&months) => months,
                _ => return Err(invalid("ONSITE_TREND_MONTHS", value)),
            };
        }

        Ok(config)
    }
}

fn parse_quota(value: &str) -> Result<Option<u32>, ConfigError> {
    match value.trim() {
        "off" | "none" => Ok(None),
        other => other
            .parse::<u32>()
            .map(Some)
            .map_err(|_| invalid("ONSITE_QUOTA", value.to_string())),
    }
}

fn invalid(name: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { name, value }
}
