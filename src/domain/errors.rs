use crate::domain::market::Timeframe;
use thiserror::Error;

/// Errors related to market data and connectivity
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Connection lost: {reason}")]
    ConnectionLost { reason: String },

    #[error("Provider returned HTTP {status} for {symbol} ({timeframe})")]
    HttpStatus {
        symbol: String,
        timeframe: Timeframe,
        status: u16,
    },

    #[error("Invalid market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("No candles returned for {symbol} ({timeframe})")]
    EmptyPayload { symbol: String, timeframe: Timeframe },
}

/// Errors raised while assembling the symbol universe
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("Connection lost: {reason}")]
    ConnectionLost { reason: String },

    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Invalid payload from {endpoint}: {reason}")]
    InvalidPayload { endpoint: String, reason: String },
}

/// Errors related to indicator computation
#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid indicator parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Invalid candle at row {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("Indicator column {column} has {actual} rows, expected {expected}")]
    ColumnMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors related to alert delivery
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Connection lost: {reason}")]
    ConnectionLost { reason: String },

    #[error("Messaging API rejected the alert (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Reasons a symbol could not be evaluated in a run
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("No {timeframe} candles available for {symbol}")]
    EmptySeries { symbol: String, timeframe: Timeframe },

    #[error("Market data unavailable for {symbol} ({timeframe}): {source}")]
    MarketData {
        symbol: String,
        timeframe: Timeframe,
        #[source]
        source: MarketDataError,
    },

    #[error("Indicator computation failed for {symbol}: {source}")]
    Indicators {
        symbol: String,
        #[source]
        source: IndicatorError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_error_formatting() {
        let error = MarketDataError::HttpStatus {
            symbol: "RELIANCE".to_string(),
            timeframe: Timeframe::OneHour,
            status: 401,
        };

        let msg = error.to_string();
        assert!(msg.contains("RELIANCE"));
        assert!(msg.contains("401"));
        assert!(msg.contains("1h"));
    }

    #[test]
    fn test_evaluation_error_keeps_source() {
        use std::error::Error as _;

        let error = EvaluationError::Indicators {
            symbol: "TCS".to_string(),
            source: IndicatorError::InvalidCandle {
                index: 3,
                reason: "high below low".to_string(),
            },
        };

        assert!(error.to_string().contains("TCS"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_market_data_failure_reason_is_kept() {
        use std::error::Error as _;

        let error = EvaluationError::MarketData {
            symbol: "SBIN".to_string(),
            timeframe: Timeframe::OneDay,
            source: MarketDataError::HttpStatus {
                symbol: "SBIN".to_string(),
                timeframe: Timeframe::OneDay,
                status: 401,
            },
        };

        let msg = error.to_string();
        assert!(msg.contains("SBIN"));
        assert!(msg.contains("401"));
        assert!(error.source().is_some());
    }
}
