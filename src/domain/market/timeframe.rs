use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle granularities the screener evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    OneHour,
    OneDay,
}

impl Timeframe {
    /// Converts to the Dhan chart API interval segment
    pub fn to_dhan_string(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::OneDay => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dhan_string())
    }
}
