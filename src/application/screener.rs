use crate::domain::errors::EvaluationError;
use crate::domain::indicators::{IndicatorFrame, IndicatorParams};
use crate::domain::market::{CandleSeries, Timeframe};
use crate::domain::ports::{
    AlertNotifier, IndicatorEngine, MarketDataService, SymbolUniverseProvider,
};
use crate::domain::screening::PatternEvaluator;
use crate::infrastructure::dhan::DEFAULT_CANDLE_LIMIT;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one screener run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub universe_size: usize,
    /// Symbols whose evaluation completed, matched or not
    pub evaluated: usize,
    /// Symbols that could not be evaluated (no data, bad data)
    pub skipped: usize,
    /// Matched symbols in evaluation order
    pub matches: Vec<String>,
    pub notified: bool,
}

/// Screens the symbol universe for the daily/hourly breakout pattern.
///
/// Symbols are processed one at a time. A failure on one symbol is logged and
/// counted as skipped; it never stops the run.
pub struct Screener {
    market_data: Arc<dyn MarketDataService>,
    universe: Arc<dyn SymbolUniverseProvider>,
    engine: Arc<dyn IndicatorEngine>,
    notifier: Arc<dyn AlertNotifier>,
    evaluator: PatternEvaluator,
    params: IndicatorParams,
    candle_limit: usize,
}

impl Screener {
    pub fn new(
        market_data: Arc<dyn MarketDataService>,
        universe: Arc<dyn SymbolUniverseProvider>,
        engine: Arc<dyn IndicatorEngine>,
        notifier: Arc<dyn AlertNotifier>,
    ) -> Self {
        Self {
            market_data,
            universe,
            engine,
            notifier,
            evaluator: PatternEvaluator::default(),
            params: IndicatorParams::default(),
            candle_limit: DEFAULT_CANDLE_LIMIT,
        }
    }

    pub fn with_evaluator(mut self, evaluator: PatternEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_params(mut self, params: IndicatorParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_candle_limit(mut self, candle_limit: usize) -> Self {
        self.candle_limit = candle_limit;
        self
    }

    pub fn run(&self) -> RunReport {
        info!("🔍 Running Screener...");

        let symbols = self.universe.symbols_or_empty();
        let mut report = RunReport {
            universe_size: symbols.len(),
            ..RunReport::default()
        };

        if symbols.is_empty() {
            warn!("Symbol universe is empty; nothing to screen");
        }

        for symbol in &symbols {
            match self.evaluate_symbol(symbol) {
                Ok(true) => {
                    info!("✅ {} matches the breakout pattern", symbol);
                    report.evaluated += 1;
                    report.matches.push(symbol.clone());
                }
                Ok(false) => report.evaluated += 1,
                Err(e) => {
                    warn!("Skipping {}: {}", symbol, e);
                    report.skipped += 1;
                }
            }
        }

        if report.matches.is_empty() {
            info!("No matches today.");
        } else {
            report.notified = self.notifier.notify_matches(&report.matches);
        }

        info!(
            "Screener finished: {} symbols, {} evaluated, {} skipped, {} matched",
            report.universe_size,
            report.evaluated,
            report.skipped,
            report.matches.len()
        );
        report
    }

    /// Stage A on daily candles, then Stage B on hourly candles. Hourly data
    /// is only fetched for symbols that clear the daily gate.
    pub fn evaluate_symbol(&self, symbol: &str) -> Result<bool, EvaluationError> {
        let daily = self.frame_for(symbol, Timeframe::OneDay)?;
        if !self.evaluator.passes_daily_gate(&daily) {
            debug!("{}: daily gate not met", symbol);
            return Ok(false);
        }

        let hourly = self.frame_for(symbol, Timeframe::OneHour)?;
        match self.evaluator.find_breakout(&hourly) {
            Some(index) => {
                debug!(
                    "{}: hourly breakout window starts at {:?}",
                    symbol,
                    hourly.timestamp(index)
                );
                Ok(true)
            }
            None => {
                debug!("{}: no hourly breakout", symbol);
                Ok(false)
            }
        }
    }

    fn frame_for(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<IndicatorFrame, EvaluationError> {
        let series: CandleSeries = self
            .market_data
            .fetch_series(symbol, timeframe, self.candle_limit)
            .map_err(|source| EvaluationError::MarketData {
                symbol: symbol.to_string(),
                timeframe,
                source,
            })?;

        if series.is_empty() {
            return Err(EvaluationError::EmptySeries {
                symbol: symbol.to_string(),
                timeframe,
            });
        }

        IndicatorFrame::compute(&series, self.engine.as_ref(), &self.params).map_err(|source| {
            EvaluationError::Indicators {
                symbol: symbol.to_string(),
                source,
            }
        })
    }
}
