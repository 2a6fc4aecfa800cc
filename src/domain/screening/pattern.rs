use crate::domain::indicators::IndicatorFrame;

/// Multi-timeframe Keltner breakout pattern.
///
/// Stage A (daily) requires the latest close to sit at or above both the upper
/// channel band and the trend average, with momentum at or above
/// `daily_momentum_min`.
///
/// Stage B (hourly) scans three-candle windows for a breakout above the upper
/// band, a pullback below the middle band while momentum cools into
/// `[pullback_momentum_floor, breakout_momentum)`, and a second breakout with
/// momentum back above `breakout_momentum`.
///
/// Rows with missing indicator values never qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternEvaluator {
    pub daily_momentum_min: f64,
    pub breakout_momentum: f64,
    pub pullback_momentum_floor: f64,
}

impl Default for PatternEvaluator {
    fn default() -> Self {
        Self {
            daily_momentum_min: 60.0,
            breakout_momentum: 60.0,
            pullback_momentum_floor: 50.0,
        }
    }
}

impl PatternEvaluator {
    pub fn new(
        daily_momentum_min: f64,
        breakout_momentum: f64,
        pullback_momentum_floor: f64,
    ) -> Self {
        Self {
            daily_momentum_min,
            breakout_momentum,
            pullback_momentum_floor,
        }
    }

    /// Stage A, evaluated on the most recent daily row.
    pub fn passes_daily_gate(&self, daily: &IndicatorFrame) -> bool {
        let Some(last) = daily.len().checked_sub(1) else {
            return false;
        };

        let (Some(close), Some(trend), Some(momentum), Some(channel)) = (
            daily.close(last),
            daily.trend(last),
            daily.momentum(last),
            daily.channel(last),
        ) else {
            return false;
        };

        close >= channel.upper && close >= trend && momentum >= self.daily_momentum_min
    }

    /// Stage B. Returns the start index of the first matching window.
    pub fn find_breakout(&self, hourly: &IndicatorFrame) -> Option<usize> {
        if hourly.len() < 3 {
            return None;
        }

        (0..=hourly.len() - 3).find(|&i| self.window_matches(hourly, i))
    }

    pub fn matches_breakout(&self, hourly: &IndicatorFrame) -> bool {
        self.find_breakout(hourly).is_some()
    }

    /// Stage A, then Stage B only when Stage A holds.
    pub fn evaluate(&self, daily: &IndicatorFrame, hourly: &IndicatorFrame) -> bool {
        self.passes_daily_gate(daily) && self.matches_breakout(hourly)
    }

    fn window_matches(&self, frame: &IndicatorFrame, i: usize) -> bool {
        self.check_window(frame, i).unwrap_or(false)
    }

    fn check_window(&self, frame: &IndicatorFrame, i: usize) -> Option<bool> {
        let (p1, p2, p3) = (frame.close(i)?, frame.close(i + 1)?, frame.close(i + 2)?);
        let (u1, m2, u3) = (
            frame.channel(i)?.upper,
            frame.channel(i + 1)?.middle,
            frame.channel(i + 2)?.upper,
        );
        let (r1, r2, r3) = (
            frame.momentum(i)?,
            frame.momentum(i + 1)?,
            frame.momentum(i + 2)?,
        );

        let cooled = r2 >= self.pullback_momentum_floor && r2 < self.breakout_momentum;

        Some(
            p1 > u1
                && p2 < m2
                && p3 > u3
                && r1 > self.breakout_momentum
                && cooled
                && r3 > self.breakout_momentum,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicators::ChannelBands;

    fn bands(upper: f64, middle: f64) -> Option<ChannelBands> {
        Some(ChannelBands {
            lower: middle - (upper - middle),
            middle,
            upper,
        })
    }

    fn daily_frame(close: f64, upper: f64, trend: f64, momentum: f64) -> IndicatorFrame {
        IndicatorFrame::from_columns(
            vec![close],
            vec![Some(trend)],
            vec![Some(momentum)],
            vec![bands(upper, upper - 5.0)],
        )
        .unwrap()
    }

    fn hourly_frame(
        closes: Vec<f64>,
        uppers: Vec<f64>,
        middles: Vec<f64>,
        momentum: Vec<f64>,
    ) -> IndicatorFrame {
        let channel = uppers
            .iter()
            .zip(&middles)
            .map(|(&u, &m)| bands(u, m))
            .collect();
        let trend = vec![None; closes.len()];
        let momentum = momentum.into_iter().map(Some).collect();
        IndicatorFrame::from_columns(closes, trend, momentum, channel).unwrap()
    }

    fn breakout_frame(pullback_momentum: f64) -> IndicatorFrame {
        hourly_frame(
            vec![10.0, 5.0, 11.0],
            vec![9.0, 8.0, 10.0],
            vec![7.0, 6.0, 8.0],
            vec![65.0, pullback_momentum, 61.0],
        )
    }

    #[test]
    fn test_daily_gate_passes() {
        let evaluator = PatternEvaluator::default();
        assert!(evaluator.passes_daily_gate(&daily_frame(100.0, 95.0, 90.0, 65.0)));
    }

    #[test]
    fn test_daily_gate_is_inclusive() {
        let evaluator = PatternEvaluator::default();
        assert!(evaluator.passes_daily_gate(&daily_frame(100.0, 100.0, 100.0, 60.0)));
    }

    #[test]
    fn test_daily_gate_rejects_weak_momentum() {
        let evaluator = PatternEvaluator::default();
        assert!(!evaluator.passes_daily_gate(&daily_frame(100.0, 95.0, 90.0, 55.0)));
    }

    #[test]
    fn test_daily_gate_rejects_close_below_bands_or_trend() {
        let evaluator = PatternEvaluator::default();
        assert!(!evaluator.passes_daily_gate(&daily_frame(100.0, 101.0, 90.0, 65.0)));
        assert!(!evaluator.passes_daily_gate(&daily_frame(100.0, 95.0, 100.5, 65.0)));
    }

    #[test]
    fn test_daily_gate_uses_last_row_only() {
        let frame = IndicatorFrame::from_columns(
            vec![100.0, 80.0],
            vec![Some(90.0), Some(90.0)],
            vec![Some(65.0), Some(65.0)],
            vec![bands(95.0, 90.0), bands(95.0, 90.0)],
        )
        .unwrap();

        assert!(!PatternEvaluator::default().passes_daily_gate(&frame));
    }

    #[test]
    fn test_daily_gate_rejects_missing_indicators() {
        let frame = IndicatorFrame::from_columns(
            vec![100.0],
            vec![None],
            vec![Some(70.0)],
            vec![bands(95.0, 90.0)],
        )
        .unwrap();
        assert!(!PatternEvaluator::default().passes_daily_gate(&frame));
    }

    #[test]
    fn test_daily_gate_rejects_empty_frame() {
        let frame = IndicatorFrame::from_columns(vec![], vec![], vec![], vec![]).unwrap();
        assert!(!PatternEvaluator::default().passes_daily_gate(&frame));
    }

    #[test]
    fn test_three_row_breakout_matches() {
        let evaluator = PatternEvaluator::default();
        assert_eq!(evaluator.find_breakout(&breakout_frame(55.0)), Some(0));
    }

    #[test]
    fn test_pullback_momentum_bounds() {
        let evaluator = PatternEvaluator::default();
        assert!(evaluator.matches_breakout(&breakout_frame(50.0)));
        assert!(!evaluator.matches_breakout(&breakout_frame(60.0)));
        assert!(!evaluator.matches_breakout(&breakout_frame(49.9)));
    }

    #[test]
    fn test_breakout_requires_pullback_below_middle() {
        let frame = hourly_frame(
            vec![10.0, 6.0, 11.0],
            vec![9.0, 8.0, 10.0],
            vec![7.0, 6.0, 8.0],
            vec![65.0, 55.0, 61.0],
        );
        assert!(!PatternEvaluator::default().matches_breakout(&frame));
    }

    #[test]
    fn test_first_matching_window_wins() {
        let frame = hourly_frame(
            vec![1.0, 10.0, 5.0, 11.0, 5.0, 12.0],
            vec![9.0, 9.0, 8.0, 10.0, 8.0, 10.0],
            vec![7.0, 7.0, 6.0, 8.0, 6.0, 8.0],
            vec![40.0, 65.0, 55.0, 61.0, 55.0, 70.0],
        );
        assert_eq!(PatternEvaluator::default().find_breakout(&frame), Some(1));
    }

    #[test]
    fn test_last_window_is_scanned() {
        let frame = hourly_frame(
            vec![1.0, 1.0, 10.0, 5.0, 11.0],
            vec![9.0, 9.0, 9.0, 8.0, 10.0],
            vec![7.0, 7.0, 7.0, 6.0, 8.0],
            vec![40.0, 40.0, 65.0, 55.0, 61.0],
        );
        assert_eq!(PatternEvaluator::default().find_breakout(&frame), Some(2));
    }

    #[test]
    fn test_short_or_warming_up_series_never_matches() {
        let evaluator = PatternEvaluator::default();
        let short = hourly_frame(vec![10.0, 5.0], vec![9.0, 8.0], vec![7.0, 6.0], vec![65.0, 55.0]);
        assert!(!evaluator.matches_breakout(&short));

        let warming_up = IndicatorFrame::from_columns(
            vec![10.0, 5.0, 11.0],
            vec![None; 3],
            vec![None, Some(55.0), Some(61.0)],
            vec![None, bands(8.0, 6.0), bands(10.0, 8.0)],
        )
        .unwrap();
        assert!(!evaluator.matches_breakout(&warming_up));
    }

    #[test]
    fn test_evaluate_skips_hourly_when_daily_fails() {
        let evaluator = PatternEvaluator::default();
        let hourly = breakout_frame(55.0);

        assert!(evaluator.evaluate(&daily_frame(100.0, 95.0, 90.0, 65.0), &hourly));
        assert!(!evaluator.evaluate(&daily_frame(100.0, 95.0, 90.0, 55.0), &hourly));
    }
}
