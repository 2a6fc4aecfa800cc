//! Configuration module for Rustscreen.
//!
//! Only credentials come from the environment: the market-data API key and
//! client id, and the messaging bot token and destination chat. Missing values
//! are not fatal; the calls that need them fail and are logged.

mod broker_config;
mod notification_config;

pub use broker_config::DhanConfig;
pub use notification_config::TelegramConfig;

use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset, blank or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the log filter from a `RUST_LOG` value. A usable value is taken as is,
/// so `RUST_LOG=debug` enables the per-symbol stage logs.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub dhan: DhanConfig,
    pub telegram: TelegramConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let config = Self {
            dhan: DhanConfig::from_env(),
            telegram: TelegramConfig::from_env(),
        };

        for name in config.missing_variables() {
            warn!("{} is not set; dependent calls will fail", name);
        }

        config
    }

    /// Names of credential variables that are unset or empty.
    pub fn missing_variables(&self) -> Vec<&'static str> {
        [
            ("DHAN_API_KEY", self.dhan.api_key.is_empty()),
            ("DHAN_CLIENT_ID", self.dhan.client_id.is_empty()),
            ("TELEGRAM_BOT_TOKEN", self.telegram.bot_token.is_empty()),
            ("TELEGRAM_CHAT_ID", self.telegram.chat_id.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("rustscreen=loud")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn test_missing_variables_lists_empty_credentials() {
        let config = Config {
            dhan: DhanConfig {
                api_key: "key".to_string(),
                client_id: String::new(),
            },
            telegram: TelegramConfig::default(),
        };

        assert_eq!(
            config.missing_variables(),
            vec!["DHAN_CLIENT_ID", "TELEGRAM_BOT_TOKEN", "TELEGRAM_CHAT_ID"]
        );
    }

    #[test]
    fn test_complete_config_has_nothing_missing() {
        let config = Config {
            dhan: DhanConfig {
                api_key: "key".to_string(),
                client_id: "1000".to_string(),
            },
            telegram: TelegramConfig {
                bot_token: "123:abc".to_string(),
                chat_id: "-100".to_string(),
            },
        };

        assert!(config.missing_variables().is_empty());
    }
}
