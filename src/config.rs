use std::{env, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ROLLOVER_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// How often the server checks for a new day.
    pub rollover_check: Duration,
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rollover_check: Duration::from_secs(DEFAULT_ROLLOVER_SECS),
            seed_demo: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = parse_or(&lookup, "PORT", defaults.port);
        let rollover_secs = parse_or(&lookup, "HABITS_ROLLOVER_SECS", DEFAULT_ROLLOVER_SECS).max(1);
        let seed_demo = match lookup("HABITS_SEED_DEMO") {
            None => defaults.seed_demo,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => false,
                "1" | "true" | "yes" | "on" | "" => true,
                other => {
                    warn!("ignoring HABITS_SEED_DEMO={other}, expected true or false");
                    defaults.seed_demo
                }
            },
        };

        Self {
            port,
            rollover_check: Duration::from_secs(rollover_secs),
            seed_demo,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring {key}={raw}, not a valid value");
            default
        }),
        None => default,
    }
}
