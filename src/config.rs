use crate::models::FormDefaults;
use chrono::{Duration, NaiveDate};
use std::{env, net::SocketAddr, str::FromStr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TARGET_CPA: f64 = 220.0;
pub const DEFAULT_ACTUAL_CPA: &str = "200, 230, 180, 210, 190";
pub const DEFAULT_WEEKS_BACK: i64 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub default_target_cpa: f64,
    pub default_actual_cpa: String,
    pub default_weeks_back: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_target_cpa: DEFAULT_TARGET_CPA,
            default_actual_cpa: DEFAULT_ACTUAL_CPA.to_string(),
            default_weeks_back: DEFAULT_WEEKS_BACK,
        }
    }
}

impl AppConfig {
    /// Reads `PORT`, `CPA_DEFAULT_TARGET`, `CPA_DEFAULT_VALUES` and
    /// `CPA_DEFAULT_WEEKS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = Self::default();
        Self {
            port: parsed(&lookup, "PORT").unwrap_or(base.port),
            default_target_cpa: parsed::<f64>(&lookup, "CPA_DEFAULT_TARGET")
                .filter(|value| value.is_finite())
                .unwrap_or(base.default_target_cpa),
            default_actual_cpa: lookup("CPA_DEFAULT_VALUES")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(base.default_actual_cpa),
            default_weeks_back: parsed::<i64>(&lookup, "CPA_DEFAULT_WEEKS")
                .filter(|weeks| *weeks > 0)
                .unwrap_or(base.default_weeks_back),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn form_defaults(&self, today: NaiveDate) -> FormDefaults {
        FormDefaults {
            start_date: today - Duration::weeks(self.default_weeks_back),
            end_date: today,
            actual_cpa: self.default_actual_cpa.clone(),
            target_cpa: self.default_target_cpa,
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring invalid {key}={raw:?}");
            None
        }
    }
}
