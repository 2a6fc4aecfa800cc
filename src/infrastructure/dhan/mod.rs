//! Dhan market data integration.

pub mod market_data;

pub use market_data::{
    DEFAULT_CANDLE_LIMIT, DhanMarketDataService, DhanMarketDataServiceBuilder,
    parse_chart_response,
};
