//! In-memory implementations of every port, for tests and dry runs.

use crate::domain::errors::{IndicatorError, MarketDataError, NotificationError, UniverseError};
use crate::domain::indicators::ChannelBands;
use crate::domain::market::{Candle, CandleSeries, Timeframe};
use crate::domain::ports::{
    AlertNotifier, IndicatorEngine, MarketDataService, SymbolUniverseProvider,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::collections::HashMap;
use std::sync::Mutex;

/// Builds one candle per close, one `step_ms` apart, with a ±0.5 range.
pub fn candles_from_closes(closes: &[f64], start_ms: i64, step_ms: i64) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let price = Decimal::from_f64(close).unwrap_or_default();
            let half = Decimal::new(5, 1);
            Candle {
                timestamp: start_ms + i as i64 * step_ms,
                open: price,
                high: price + half,
                low: price - half,
                close: price,
                volume: Decimal::from(1000),
            }
        })
        .collect()
}

#[derive(Default)]
pub struct MockMarketDataService {
    series: Mutex<HashMap<(String, Timeframe), Vec<Candle>>>,
    requests: Mutex<Vec<(String, Timeframe)>>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(self, symbol: &str, timeframe: Timeframe, candles: Vec<Candle>) -> Self {
        if let Ok(mut series) = self.series.lock() {
            series.insert((symbol.to_string(), timeframe), candles);
        }
        self
    }

    /// Every `(symbol, timeframe)` requested so far, in order.
    pub fn requests(&self) -> Vec<(String, Timeframe)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self, timeframe: Timeframe) -> usize {
        self.requests()
            .iter()
            .filter(|(_, tf)| *tf == timeframe)
            .count()
    }
}

impl MarketDataService for MockMarketDataService {
    fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, MarketDataError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((symbol.to_string(), timeframe));
        }

        let candles = self
            .series
            .lock()
            .ok()
            .and_then(|series| series.get(&(symbol.to_string(), timeframe)).cloned())
            .ok_or_else(|| MarketDataError::ConnectionLost {
                reason: format!("no mock data for {} ({})", symbol, timeframe),
            })?;

        if candles.is_empty() {
            return Err(MarketDataError::EmptyPayload {
                symbol: symbol.to_string(),
                timeframe,
            });
        }

        Ok(CandleSeries::new(symbol, timeframe, candles).truncate_to_recent(limit))
    }
}

pub struct MockSymbolUniverse {
    result: Result<Vec<String>, String>,
}

impl MockSymbolUniverse {
    pub fn new(symbols: &[&str]) -> Self {
        Self {
            result: Ok(symbols.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
        }
    }
}

impl SymbolUniverseProvider for MockSymbolUniverse {
    fn fetch_symbols(&self) -> Result<Vec<String>, UniverseError> {
        self.result
            .clone()
            .map_err(|reason| UniverseError::ConnectionLost { reason })
    }
}

#[derive(Debug, Clone, Default)]
struct ScriptedColumns {
    trend: Vec<Option<f64>>,
    momentum: Vec<Option<f64>>,
    channel: Vec<Option<ChannelBands>>,
}

/// Returns preset indicator columns for a known close sequence; unknown
/// sequences get all-missing columns.
#[derive(Default)]
pub struct ScriptedIndicatorEngine {
    scripts: Vec<(Vec<f64>, ScriptedColumns)>,
}

impl ScriptedIndicatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(
        mut self,
        closes: Vec<f64>,
        trend: Vec<Option<f64>>,
        momentum: Vec<Option<f64>>,
        channel: Vec<Option<ChannelBands>>,
    ) -> Self {
        self.scripts.push((
            closes,
            ScriptedColumns {
                trend,
                momentum,
                channel,
            },
        ));
        self
    }

    fn lookup(&self, closes: &[f64]) -> ScriptedColumns {
        self.scripts
            .iter()
            .find(|(known, _)| known.as_slice() == closes)
            .map(|(_, columns)| columns.clone())
            .unwrap_or_else(|| ScriptedColumns {
                trend: vec![None; closes.len()],
                momentum: vec![None; closes.len()],
                channel: vec![None; closes.len()],
            })
    }
}

impl IndicatorEngine for ScriptedIndicatorEngine {
    fn trend_average(
        &self,
        closes: &[f64],
        _length: usize,
    ) -> Result<Vec<Option<f64>>, IndicatorError> {
        Ok(self.lookup(closes).trend)
    }

    fn momentum(&self, closes: &[f64], _length: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
        Ok(self.lookup(closes).momentum)
    }

    fn channel(
        &self,
        candles: &[Candle],
        _length: usize,
        _scalar: f64,
    ) -> Result<Vec<Option<ChannelBands>>, IndicatorError> {
        let closes: Vec<f64> = candles
            .iter()
            .map(|c| c.close.to_f64().unwrap_or(f64::NAN))
            .collect();
        Ok(self.lookup(&closes).channel)
    }
}

#[derive(Default)]
pub struct MockAlertNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl MockAlertNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Messages handed to `send`, including ones that failed.
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl AlertNotifier for MockAlertNotifier {
    fn send(&self, message: &str) -> Result<(), NotificationError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.to_string());
        }

        if self.fail {
            return Err(NotificationError::Rejected {
                status: 400,
                description: "Bad Request: chat not found".to_string(),
            });
        }
        Ok(())
    }
}
