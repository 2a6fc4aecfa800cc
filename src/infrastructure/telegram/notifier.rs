use crate::config::TelegramConfig;
use crate::domain::errors::NotificationError;
use crate::domain::ports::AlertNotifier;
use crate::infrastructure::core::HttpClientFactory;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Posts alerts through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    api_url: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_api_url(config, TELEGRAM_API_URL)
    }

    pub fn with_api_url(config: TelegramConfig, api_url: &str) -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            config,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.config.bot_token)
    }
}

impl AlertNotifier for TelegramNotifier {
    fn send(&self, message: &str) -> Result<(), NotificationError> {
        let form = [
            ("chat_id", self.config.chat_id.as_str()),
            ("text", message),
            ("parse_mode", "Markdown"),
        ];

        let response = self
            .client
            .post(self.send_message_url())
            .form(&form)
            .send()
            // The URL embeds the bot token; keep it out of logs
            .map_err(|e| NotificationError::ConnectionLost {
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => {
                debug!("Telegram accepted alert ({} chars)", message.len());
                Ok(())
            }
            other => Err(NotificationError::Rejected {
                status: status.as_u16(),
                description: other
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| "unexpected response".to_string()),
            }),
        }
    }
}
