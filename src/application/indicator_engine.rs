use crate::domain::errors::IndicatorError;
use crate::domain::indicators::ChannelBands;
use crate::domain::market::Candle;
use crate::domain::ports::IndicatorEngine;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage, TrueRange};
use ta::{Close, DataItem, Next};

/// SMA-seeded exponential smoothing.
///
/// The first `length - 1` rows are `None`; row `length - 1` holds the simple
/// mean of the first `length` inputs and later rows apply an EMA of
/// `ema_period` on top of it. With `ema_period == length` this is the usual
/// EMA (`2 / (n + 1)`); with `ema_period == 2n - 1` it is Wilder's `1 / n`.
struct SeededSmoother {
    length: usize,
    seen: usize,
    sma: SimpleMovingAverage,
    ema: ExponentialMovingAverage,
}

impl SeededSmoother {
    fn new(length: usize, ema_period: usize) -> Result<Self, IndicatorError> {
        let invalid = |e: ta::errors::TaError| IndicatorError::InvalidParameter {
            name: "length",
            value: format!("{} ({:?})", length, e),
        };

        Ok(Self {
            length,
            seen: 0,
            sma: SimpleMovingAverage::new(length).map_err(invalid)?,
            ema: ExponentialMovingAverage::new(ema_period).map_err(invalid)?,
        })
    }

    fn ema(length: usize) -> Result<Self, IndicatorError> {
        Self::new(length, length)
    }

    fn wilder(length: usize) -> Result<Self, IndicatorError> {
        Self::new(length, 2 * length - 1)
    }

    fn next(&mut self, value: f64) -> Option<f64> {
        self.seen += 1;
        let mean = self.sma.next(value);

        if self.seen < self.length {
            None
        } else if self.seen == self.length {
            Some(self.ema.next(mean))
        } else {
            Some(self.ema.next(value))
        }
    }
}

fn require_length(name: &'static str, length: usize) -> Result<(), IndicatorError> {
    if length == 0 {
        return Err(IndicatorError::InvalidParameter {
            name,
            value: length.to_string(),
        });
    }
    Ok(())
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn data_item(index: usize, candle: &Candle) -> Result<DataItem, IndicatorError> {
    DataItem::builder()
        .open(to_f64(candle.open))
        .high(to_f64(candle.high))
        .low(to_f64(candle.low))
        .close(to_f64(candle.close))
        .volume(to_f64(candle.volume))
        .build()
        .map_err(|e| IndicatorError::InvalidCandle {
            index,
            reason: format!("{:?}", e),
        })
}

/// [`IndicatorEngine`] backed by the `ta` crate.
///
/// - trend average: EMA seeded with the SMA of the first `length` closes
/// - momentum: RSI with Wilder smoothing, first value at row `length`
/// - channel: EMA(close) ± scalar × EMA(true range); true range needs a
///   previous close, so the channel's first value is at row `length`
#[derive(Debug, Clone, Copy, Default)]
pub struct TaIndicatorEngine;

impl TaIndicatorEngine {
    pub fn new() -> Self {
        Self
    }
}

impl IndicatorEngine for TaIndicatorEngine {
    fn trend_average(
        &self,
        closes: &[f64],
        length: usize,
    ) -> Result<Vec<Option<f64>>, IndicatorError> {
        require_length("trend_length", length)?;
        let mut ema = SeededSmoother::ema(length)?;
        Ok(closes.iter().map(|&close| ema.next(close)).collect())
    }

    fn momentum(&self, closes: &[f64], length: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
        require_length("momentum_length", length)?;
        let mut avg_gain = SeededSmoother::wilder(length)?;
        let mut avg_loss = SeededSmoother::wilder(length)?;

        let mut rsi = Vec::with_capacity(closes.len());
        if closes.is_empty() {
            return Ok(rsi);
        }
        rsi.push(None);

        for pair in closes.windows(2) {
            let change = pair[1] - pair[0];
            let gain = avg_gain.next(change.max(0.0));
            let loss = avg_loss.next((-change).max(0.0));

            rsi.push(match (gain, loss) {
                (Some(gain), Some(loss)) => Some(relative_strength_index(gain, loss)),
                _ => None,
            });
        }

        Ok(rsi)
    }

    fn channel(
        &self,
        candles: &[Candle],
        length: usize,
        scalar: f64,
    ) -> Result<Vec<Option<ChannelBands>>, IndicatorError> {
        require_length("channel_length", length)?;
        if !scalar.is_finite() || scalar < 0.0 {
            return Err(IndicatorError::InvalidParameter {
                name: "channel_scalar",
                value: scalar.to_string(),
            });
        }

        let mut middle = SeededSmoother::ema(length)?;
        let mut band = SeededSmoother::ema(length)?;
        let mut true_range = TrueRange::new();

        let mut channel = Vec::with_capacity(candles.len());
        for (index, candle) in candles.iter().enumerate() {
            let item = data_item(index, candle)?;
            let mid = middle.next(item.close());
            let range = true_range.next(&item);

            // True range of the first row has no previous close
            let width = if index == 0 { None } else { band.next(range) };

            channel.push(match (mid, width) {
                (Some(mid), Some(width)) => Some(ChannelBands {
                    lower: mid - scalar * width,
                    middle: mid,
                    upper: mid + scalar * width,
                }),
                _ => None,
            });
        }

        Ok(channel)
    }
}

fn relative_strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}
