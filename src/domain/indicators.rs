//! Candle series extended with the indicator columns the screener reads.

use crate::domain::errors::IndicatorError;
use crate::domain::market::CandleSeries;
use crate::domain::ports::IndicatorEngine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelBands {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

/// Lookbacks used for every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub trend_length: usize,
    pub momentum_length: usize,
    pub channel_length: usize,
    pub channel_scalar: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            trend_length: 88,
            momentum_length: 14,
            channel_length: 21,
            channel_scalar: 1.0,
        }
    }
}

/// Closes plus trend, momentum and channel columns, aligned by row.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    /// `None` for frames assembled from bare columns
    timestamps: Vec<Option<i64>>,
    closes: Vec<f64>,
    trend: Vec<Option<f64>>,
    momentum: Vec<Option<f64>>,
    channel: Vec<Option<ChannelBands>>,
}

impl IndicatorFrame {
    pub fn compute(
        series: &CandleSeries,
        engine: &dyn IndicatorEngine,
        params: &IndicatorParams,
    ) -> Result<Self, IndicatorError> {
        let closes = series.closes();
        let trend = engine.trend_average(&closes, params.trend_length)?;
        let momentum = engine.momentum(&closes, params.momentum_length)?;
        let channel = engine.channel(
            series.candles(),
            params.channel_length,
            params.channel_scalar,
        )?;

        let mut frame = Self::from_columns(closes, trend, momentum, channel)?;
        frame.timestamps = series.timestamps().into_iter().map(Some).collect();
        Ok(frame)
    }

    /// Builds a frame from precomputed columns. All columns must match `closes` in length.
    /// The frame carries no timestamps.
    pub fn from_columns(
        closes: Vec<f64>,
        trend: Vec<Option<f64>>,
        momentum: Vec<Option<f64>>,
        channel: Vec<Option<ChannelBands>>,
    ) -> Result<Self, IndicatorError> {
        let expected = closes.len();
        for (column, actual) in [
            ("trend", trend.len()),
            ("momentum", momentum.len()),
            ("channel", channel.len()),
        ] {
            if actual != expected {
                return Err(IndicatorError::ColumnMismatch {
                    column,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self {
            timestamps: vec![None; expected],
            closes,
            trend,
            momentum,
            channel,
        })
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn timestamp(&self, index: usize) -> Option<i64> {
        self.timestamps.get(index).copied().flatten()
    }

    pub fn close(&self, index: usize) -> Option<f64> {
        self.closes.get(index).copied().filter(|c| c.is_finite())
    }

    pub fn trend(&self, index: usize) -> Option<f64> {
        self.trend.get(index).copied().flatten()
    }

    pub fn momentum(&self, index: usize) -> Option<f64> {
        self.momentum.get(index).copied().flatten()
    }

    pub fn channel(&self, index: usize) -> Option<ChannelBands> {
        self.channel.get(index).copied().flatten()
    }
}
