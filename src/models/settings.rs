use std::time::Duration;

use config::{Config, ConfigBuilder, Environment, File, Map};
use serde::Deserialize;

use crate::utils::errors::SettingsError;
use crate::utils::logger::LogLevel;

/// Environment variables read by [`Settings::load`]; everything else is ignored.
const ENV_KEYS: [&str; 3] = ["CARD_SERVER", "REQUEST_TIMEOUT_SECS", "LOG_LEVEL"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub card_server: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Settings {
    /// Loads settings from defaults, an optional `wallet-card` file in the working
    /// directory, and the `CARD_SERVER`, `REQUEST_TIMEOUT_SECS` and `LOG_LEVEL`
    /// environment variables, later sources winning.
    pub fn load() -> Result<Self, SettingsError> {
        let builder = Settings::defaults()?
            .add_source(File::with_name("wallet-card").required(false))
            .add_source(Settings::environment(std::env::vars()));

        Settings::from_config(builder.build()?)
    }

    /// Environment source restricted to `ENV_KEYS`, keyed by the lowercase field names.
    pub fn environment<I>(vars: I) -> Environment
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let known: Map<String, String> = vars
            .into_iter()
            .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();

        Environment::default().source(Some(known)).try_parsing(true)
    }

    pub fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, SettingsError> {
        Ok(Config::builder()
            .set_default("card_server", "http://card-service")?
            .set_default("request_timeout_secs", 5)?
            .set_default("log_level", "INFO")?)
    }

    pub fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings = config.try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_level(&self) -> Result<LogLevel, SettingsError> {
        self.log_level
            .parse::<LogLevel>()
            .map_err(|reason| SettingsError::InvalidValue {
                key: "log_level",
                reason,
            })
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.card_server.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                key: "card_server",
                reason: "must not be empty".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        self.log_level()?;
        Ok(())
    }
}
