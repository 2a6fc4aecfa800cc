use crate::domain::errors::{IndicatorError, MarketDataError, NotificationError, UniverseError};
use crate::domain::indicators::ChannelBands;
use crate::domain::market::{Candle, CandleSeries, Timeframe};
use crate::domain::screening::alert::format_alert;
use tracing::{error, info, warn};

pub trait MarketDataService: Send + Sync {
    /// Fetches at most `limit` of the most recent candles, oldest first.
    fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, MarketDataError>;

    /// Like [`MarketDataService::fetch_series`], but any failure is logged and
    /// reported as an empty series.
    fn series_or_empty(&self, symbol: &str, timeframe: Timeframe, limit: usize) -> CandleSeries {
        match self.fetch_series(symbol, timeframe, limit) {
            Ok(series) => series,
            Err(e) => {
                warn!("Error fetching {} data for {}: {}", timeframe, symbol, e);
                CandleSeries::empty(symbol, timeframe)
            }
        }
    }
}

pub trait SymbolUniverseProvider: Send + Sync {
    /// Returns the deduplicated symbol list, sorted ascending.
    fn fetch_symbols(&self) -> Result<Vec<String>, UniverseError>;

    fn symbols_or_empty(&self) -> Vec<String> {
        match self.fetch_symbols() {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!("Error fetching symbols: {}", e);
                Vec::new()
            }
        }
    }
}

/// Indicator math behind a narrow seam so evaluation can run on synthetic columns.
///
/// Every output is aligned with its input; rows still inside the warm-up are `None`.
pub trait IndicatorEngine: Send + Sync {
    /// Exponential moving average of `closes`.
    fn trend_average(&self, closes: &[f64], length: usize)
    -> Result<Vec<Option<f64>>, IndicatorError>;

    /// Relative strength index of `closes`, in [0, 100].
    fn momentum(&self, closes: &[f64], length: usize) -> Result<Vec<Option<f64>>, IndicatorError>;

    /// Keltner-style volatility channel.
    fn channel(
        &self,
        candles: &[Candle],
        length: usize,
        scalar: f64,
    ) -> Result<Vec<Option<ChannelBands>>, IndicatorError>;
}

pub trait AlertNotifier: Send + Sync {
    fn send(&self, message: &str) -> Result<(), NotificationError>;

    /// Sends one alert listing `symbols`. Nothing is sent for an empty list and
    /// delivery failures are logged, never returned. Returns whether the alert
    /// went out.
    fn notify_matches(&self, symbols: &[String]) -> bool {
        let Some(message) = format_alert(symbols) else {
            return false;
        };

        match self.send(&message) {
            Ok(()) => {
                info!("Alert sent for {} symbol(s)", symbols.len());
                true
            }
            Err(e) => {
                error!("Alert delivery failed: {}", e);
                false
            }
        }
    }
}
