//! Server configuration
//!
//! Defaults suit local development. Every field can be overridden from
//! the environment with a `POISE_` variable.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use poise_core::{PoiseError, PoiseResult};
use poise_signal::RelayConfig;

pub const ENV_BIND: &str = "POISE_BIND";
pub const ENV_IDLE_TIMEOUT: &str = "POISE_IDLE_TIMEOUT";
pub const ENV_CHANNEL_CAPACITY: &str = "POISE_CHANNEL_CAPACITY";
pub const ENV_MAX_FRAME_BYTES: &str = "POISE_MAX_FRAME_BYTES";
pub const ENV_ANALYSIS_CONCURRENCY: &str = "POISE_ANALYSIS_CONCURRENCY";
pub const ENV_LOG_FORMAT: &str = "POISE_LOG_FORMAT";

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = PoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(PoiseError::Config(format!("unknown log format {other:?}"))),
        }
    }
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,
    /// Close a WebSocket session after this long without inbound traffic
    pub idle_timeout: Duration,
    /// Outbound queue depth per connection
    pub channel_capacity: usize,
    /// Largest accepted frame/message, in bytes of text
    pub max_frame_bytes: usize,
    /// Frames analyzed at once across all sessions
    pub analysis_concurrency: usize,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            idle_timeout: Duration::from_secs(300),
            channel_capacity: 64,
            max_frame_bytes: 4 * 1024 * 1024,
            analysis_concurrency: 4,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `POISE_*` environment variables
    pub fn from_env() -> PoiseResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> PoiseResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(raw) = lookup(ENV_BIND) {
            config.bind_addr = parse(ENV_BIND, &raw)?;
        }
        if let Some(raw) = lookup(ENV_IDLE_TIMEOUT) {
            config.idle_timeout = humantime::parse_duration(raw.trim())
                .map_err(|e| PoiseError::Config(format!("{ENV_IDLE_TIMEOUT}: {e}")))?;
        }
        if let Some(raw) = lookup(ENV_CHANNEL_CAPACITY) {
            config.channel_capacity = parse(ENV_CHANNEL_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_FRAME_BYTES) {
            config.max_frame_bytes = parse(ENV_MAX_FRAME_BYTES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ANALYSIS_CONCURRENCY) {
            config.analysis_concurrency = parse(ENV_ANALYSIS_CONCURRENCY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log_format = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PoiseResult<()> {
        if self.idle_timeout.is_zero() {
            return Err(PoiseError::Config("idle timeout must be non-zero".into()));
        }
        if self.channel_capacity == 0 {
            return Err(PoiseError::Config("channel capacity must be non-zero".into()));
        }
        if self.max_frame_bytes == 0 {
            return Err(PoiseError::Config("max frame bytes must be non-zero".into()));
        }
        if self.analysis_concurrency == 0 {
            return Err(PoiseError::Config("analysis concurrency must be non-zero".into()));
        }
        Ok(())
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            channel_capacity: self.channel_capacity,
        }
    }
}

fn parse<T>(key: &str, raw: &str) -> PoiseResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| PoiseError::Config(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.idle_timeout, Duration::from_secs(300));
        assert_eq!(config.relay_config().channel_capacity, 64);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_BIND, "127.0.0.1:9100"),
            (ENV_IDLE_TIMEOUT, "90s"),
            (ENV_CHANNEL_CAPACITY, "8"),
            (ENV_ANALYSIS_CONCURRENCY, "2"),
            (ENV_LOG_FORMAT, "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9100".parse().unwrap());
        assert_eq!(config.idle_timeout, Duration::from_secs(90));
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.analysis_concurrency, 2);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        assert!(ServerConfig::from_lookup(lookup(&[(ENV_BIND, "nowhere")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[(ENV_IDLE_TIMEOUT, "soon")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[(ENV_CHANNEL_CAPACITY, "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(ENV_IDLE_TIMEOUT, "2m");
        std::env::set_var(ENV_MAX_FRAME_BYTES, "1024");
        let config = ServerConfig::from_env();
        std::env::remove_var(ENV_IDLE_TIMEOUT);
        std::env::remove_var(ENV_MAX_FRAME_BYTES);

        let config = config.unwrap();
        assert_eq!(config.idle_timeout, Duration::from_secs(120));
        assert_eq!(config.max_frame_bytes, 1024);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage() {
        std::env::set_var(ENV_ANALYSIS_CONCURRENCY, "many");
        let result = ServerConfig::from_env();
        std::env::remove_var(ENV_ANALYSIS_CONCURRENCY);

        assert!(matches!(result, Err(PoiseError::Config(_))));
    }
}
