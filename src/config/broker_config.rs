//! Market-data provider credentials from environment variables.

use std::env;

/// Dhan API credentials
#[derive(Debug, Clone, Default)]
pub struct DhanConfig {
    pub api_key: String,
    pub client_id: String,
}

impl DhanConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("DHAN_API_KEY").unwrap_or_default(),
            client_id: env::var("DHAN_CLIENT_ID").unwrap_or_default(),
        }
    }
}
