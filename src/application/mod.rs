// Indicator math backed by the `ta` crate
pub mod indicator_engine;

// Run orchestration: universe, per-symbol evaluation, alert
pub mod screener;

pub use indicator_engine::TaIndicatorEngine;
pub use screener::{RunReport, Screener};
