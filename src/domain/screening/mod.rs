// Alert message layout
pub mod alert;

// Daily gate and hourly breakout scan
pub mod pattern;

// Trading-hours gate
pub mod session;

pub use alert::format_alert;
pub use pattern::PatternEvaluator;
pub use session::{SessionStatus, TradingSession};
