use std::time::Duration;

use anyhow::Context;

use crate::view::add_screen::DEFAULT_ERROR_DISPLAY;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://tasks.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub error_display: Duration,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let error_display = match lookup("TASKS_ERROR_DISPLAY_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim().parse().with_context(|| format!("TASKS_ERROR_DISPLAY_SECS must be whole seconds, got '{raw}'"))?,
            ),
            None => DEFAULT_ERROR_DISPLAY,
        };
        Ok(Self { database_url, error_display })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.error_display, Duration::from_secs(3));
    }

    #[test]
    fn overrides_and_bad_values() {
        let config = AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".into()),
            "TASKS_ERROR_DISPLAY_SECS" => Some("5".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.error_display, Duration::from_secs(5));

        let err = AppConfig::from_lookup(|key| (key == "TASKS_ERROR_DISPLAY_SECS").then(|| "soon".to_string())).unwrap_err();
        assert!(err.to_string().contains("TASKS_ERROR_DISPLAY_SECS"));
    }
}
