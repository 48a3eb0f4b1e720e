use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,

    /// Access-token lifetime as a duration string, e.g. "15m" or "900s"
    #[serde(default = "default_access_ttl")]
    pub access_ttl: String,

    /// Refresh-token lifetime in whole days
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
}

fn default_access_ttl() -> String {
    "15m".to_string()
}

fn default_refresh_ttl_days() -> i64 {
    30
}

fn default_hash_cost() -> u32 {
    12
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Reject invalid deployments at startup rather than on first use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.access_secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.access_secret must not be empty".to_string(),
            ));
        }

        if self.jwt.refresh_secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.refresh_secret must not be empty".to_string(),
            ));
        }

        if self.jwt.refresh_ttl_days < 1 {
            return Err(ConfigError::Message(
                "jwt.refresh_ttl_days must be at least 1".to_string(),
            ));
        }

        if self.password.hash_cost < 8 {
            return Err(ConfigError::Message(
                "password.hash_cost must be at least 8".to_string(),
            ));
        }

        self.access_ttl()?;

        Ok(())
    }

    /// Parse the configured access-token lifetime.
    pub fn access_ttl(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.jwt.access_ttl).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.access_ttl is not a valid duration: {}",
                self.jwt.access_ttl
            ))
        })
    }
}

/// Parse a duration string: a number with an optional s/m/h/d suffix.
/// A bare number is taken as seconds.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (number, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(index) => value.split_at(index),
        None => (value, "s"),
    };

    let amount: i64 = number.parse().ok()?;
    if amount < 1 {
        return None;
    }

    match unit {
        "s" => Some(Duration::seconds(amount)),
        "m" => Some(Duration::minutes(amount)),
        "h" => Some(Duration::hours(amount)),
        "d" => Some(Duration::days(amount)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/gym".to_string(),
            },
            server: ServerConfig { http_port: 3000 },
            jwt: JwtConfig {
                access_secret: "access-secret".to_string(),
                refresh_secret: "refresh-secret".to_string(),
                access_ttl: "15m".to_string(),
                refresh_ttl_days: 30,
            },
            password: PasswordConfig { hash_cost: 12 },
        }
    }

    #[test]
    fn test_valid_config_accepted() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = valid_config();
        config.jwt.access_secret.clear();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.jwt.refresh_secret.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_refresh_ttl_below_one_day_rejected() {
        let mut config = valid_config();
        config.jwt.refresh_ttl_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hash_cost_below_minimum_rejected() {
        let mut config = valid_config();
        config.password.hash_cost = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("15m"), Some(Duration::minutes(15)));
        assert_eq!(parse_duration("900s"), Some(Duration::seconds(900)));
        assert_eq!(parse_duration("2h"), Some(Duration::hours(2)));
        assert_eq!(parse_duration("1d"), Some(Duration::days(1)));
        assert_eq!(parse_duration("90"), Some(Duration::seconds(90)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("fifteen"), None);
        assert_eq!(parse_duration("15x"), None);
        assert_eq!(parse_duration("0m"), None);
    }
}
