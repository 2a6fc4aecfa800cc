// Candles, series and timeframes
pub mod market;

// Indicator columns over a candle series
pub mod indicators;

// Port interfaces
pub mod ports;

// Breakout pattern, trading session and alert layout
pub mod screening;

// Domain-specific error types
pub mod errors;
