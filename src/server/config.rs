use std::{str::FromStr, time::Duration};

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_ENV: &str = "development";
const DEFAULT_SENDER: &str = "Marquee <no-reply@marquee.local>";

/// Database connection pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Duration,
}

/// Per-client token bucket settings.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Tokens added per second.
    pub rps: f64,
    /// Bucket capacity, also the initial fill.
    pub burst: u32,
    pub enabled: bool,
    /// How often idle clients are swept.
    pub sweep_interval: Duration,
    /// A client idle for longer than `sweep_interval * idle_multiple` is evicted.
    pub idle_multiple: u32,
}

impl LimiterConfig {
    pub fn idle_threshold(&self) -> Duration {
        self.sweep_interval * self.idle_multiple
    }

    /// Rejects settings the limiter cannot run with.
    ///
    /// # Returns
    /// - `Ok(())` - `rps` is finite and non-negative, `burst` and `idle_multiple` are at
    ///   least 1, and `sweep_interval` is non-zero
    /// - `Err(ConfigError::InvalidValue)` - The first offending setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rps.is_finite() || self.rps < 0.0 {
            return Err(invalid("LIMITER_RPS", self.rps, "must be a finite, non-negative number"));
        }
        if self.burst < 1 {
            return Err(invalid("LIMITER_BURST", self.burst, "must be at least 1"));
        }
        if self.sweep_interval.is_zero() {
            return Err(invalid(
                "LIMITER_SWEEP_INTERVAL_SECS",
                self.sweep_interval.as_secs(),
                "must be at least 1",
            ));
        }
        if self.idle_multiple < 1 {
            return Err(invalid(
                "LIMITER_IDLE_MULTIPLE",
                self.idle_multiple,
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn invalid(name: &str, value: impl std::fmt::Display, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            rps: 2.0,
            burst: 4,
            enabled: true,
            sweep_interval: Duration::from_secs(60),
            idle_multiple: 3,
        }
    }
}

/// Shutdown timing.
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Time given to in-flight HTTP exchanges after the acceptor closes.
    pub grace: Duration,
    /// Upper bound for the background task drain. `None` waits indefinitely.
    pub drain_timeout: Option<Duration>,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(5),
            drain_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Deployment environment name, reported by the health check.
    pub env: String,
    pub database: DatabaseConfig,
    pub limiter: LimiterConfig,
    pub shutdown: ShutdownConfig,
    /// `From` address used for outbound mail.
    pub smtp_sender: String,
    /// Origins allowed to make cross-origin requests.
    pub cors_trusted_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let limiter_defaults = LimiterConfig::default();
        let shutdown_defaults = ShutdownConfig::default();

        let limiter = LimiterConfig {
            rps: optional_var("LIMITER_RPS")?.unwrap_or(limiter_defaults.rps),
            burst: optional_var("LIMITER_BURST")?.unwrap_or(limiter_defaults.burst),
            enabled: optional_var("LIMITER_ENABLED")?.unwrap_or(limiter_defaults.enabled),
            sweep_interval: optional_var("LIMITER_SWEEP_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(limiter_defaults.sweep_interval),
            idle_multiple: optional_var("LIMITER_IDLE_MULTIPLE")?
                .unwrap_or(limiter_defaults.idle_multiple),
        };
        limiter.validate()?;

        Ok(Self {
            port: optional_var("PORT")?.unwrap_or(DEFAULT_PORT),
            env: std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string()),
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
                max_connections: optional_var("DB_MAX_CONNECTIONS")?.unwrap_or(25),
                min_connections: optional_var("DB_MIN_CONNECTIONS")?.unwrap_or(1),
                idle_timeout: Duration::from_secs(
                    optional_var("DB_IDLE_TIMEOUT_SECS")?.unwrap_or(900),
                ),
            },
            limiter,
            shutdown: ShutdownConfig {
                grace: optional_var("SHUTDOWN_GRACE_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(shutdown_defaults.grace),
                drain_timeout: optional_var("BACKGROUND_DRAIN_TIMEOUT_SECS")?
                    .map(Duration::from_secs),
            },
            smtp_sender: std::env::var("SMTP_SENDER")
                .unwrap_or_else(|_| DEFAULT_SENDER.to_string()),
            cors_trusted_origins: std::env::var("CORS_TRUSTED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
        })
    }
}

/// Reads and parses an optional environment variable.
///
/// # Returns
/// - `Ok(None)` - Variable is unset
/// - `Ok(Some(value))` - Variable parsed successfully
/// - `Err(ConfigError::InvalidValue)` - Variable is set but does not parse as `T`
fn optional_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
