//! Dhan Market Data Service
//!
//! Fetches daily and hourly NSE candles from the Dhan chart endpoint.

use crate::config::DhanConfig;
use crate::domain::errors::MarketDataError;
use crate::domain::market::{Candle, CandleSeries, Timeframe};
use crate::domain::ports::MarketDataService;
use crate::domain::screening::session::ist;
use crate::infrastructure::core::HttpClientFactory;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info};

pub const DHAN_BASE_URL: &str = "https://api.dhan.co";
pub const EXCHANGE: &str = "NSE";

/// Rows requested per chart call
pub const DEFAULT_CANDLE_LIMIT: usize = 100;

/// Epoch values at or above this are milliseconds
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

#[derive(Debug, Deserialize)]
struct DhanChartResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

pub struct DhanMarketDataService {
    client: Client,
    config: DhanConfig,
    base_url: String,
}

impl DhanMarketDataService {
    pub fn new(config: DhanConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> DhanMarketDataServiceBuilder {
        DhanMarketDataServiceBuilder::default()
    }

    fn chart_url(&self, symbol: &str, timeframe: Timeframe) -> String {
        format!(
            "{}/market/v1/chart/intraday/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            symbol,
            EXCHANGE,
            timeframe.to_dhan_string()
        )
    }
}

#[derive(Default)]
pub struct DhanMarketDataServiceBuilder {
    config: Option<DhanConfig>,
    base_url: Option<String>,
}

impl DhanMarketDataServiceBuilder {
    pub fn config(mut self, config: DhanConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn build(self) -> DhanMarketDataService {
        DhanMarketDataService {
            client: HttpClientFactory::create_client(),
            config: self.config.unwrap_or_default(),
            base_url: self.base_url.unwrap_or_else(|| DHAN_BASE_URL.to_string()),
        }
    }
}

impl MarketDataService for DhanMarketDataService {
    fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, MarketDataError> {
        let url = self.chart_url(symbol, timeframe);
        let limit_str = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit_str.as_str())])
            .header("accept", "application/json")
            .header("access-token", &self.config.api_key)
            .header("client-id", &self.config.client_id)
            .send()
            .map_err(|e| MarketDataError::ConnectionLost {
                reason: format!("chart request for {}: {}", symbol, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                symbol: symbol.to_string(),
                timeframe,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| MarketDataError::ConnectionLost {
            reason: format!("chart body for {}: {}", symbol, e),
        })?;

        let series = parse_chart_response(symbol, timeframe, &body, limit)?;
        info!(
            "DhanMarketDataService: Fetched {} {} bars for {}",
            series.len(),
            timeframe,
            symbol
        );
        Ok(series)
    }
}

/// Parses a chart payload of `[timestamp, open, high, low, close, volume]` rows.
///
/// Rows that cannot be parsed are dropped; a payload with no usable rows is
/// [`MarketDataError::EmptyPayload`].
pub fn parse_chart_response(
    symbol: &str,
    timeframe: Timeframe,
    body: &str,
    limit: usize,
) -> Result<CandleSeries, MarketDataError> {
    let response: DhanChartResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

    let total = response.data.len();
    let candles: Vec<Candle> = response.data.iter().filter_map(parse_row).collect();

    if candles.len() < total {
        debug!(
            "Dropped {} malformed {} rows for {}",
            total - candles.len(),
            timeframe,
            symbol
        );
    }

    if candles.is_empty() {
        return Err(MarketDataError::EmptyPayload {
            symbol: symbol.to_string(),
            timeframe,
        });
    }

    Ok(CandleSeries::new(symbol, timeframe, candles).truncate_to_recent(limit))
}

fn parse_row(row: &serde_json::Value) -> Option<Candle> {
    let arr = row.as_array()?;
    if arr.len() < 6 {
        return None;
    }

    Some(Candle {
        timestamp: parse_timestamp(&arr[0])?,
        open: parse_decimal(&arr[1])?,
        high: parse_decimal(&arr[2])?,
        low: parse_decimal(&arr[3])?,
        close: parse_decimal(&arr[4])?,
        volume: parse_decimal(&arr[5])?,
    })
}

fn parse_decimal(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Unix milliseconds from epoch seconds, epoch milliseconds, RFC 3339, or a
/// naive IST date/datetime string.
fn parse_timestamp(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => {
            let epoch = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            if epoch <= 0 {
                return None;
            }
            if epoch >= EPOCH_MILLIS_THRESHOLD {
                Some(epoch)
            } else {
                epoch.checked_mul(1000)
            }
        }
        serde_json::Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    ist()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp_millis())
}
