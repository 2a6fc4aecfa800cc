pub mod core;
pub mod dhan;
pub mod mock;
pub mod nse;
pub mod telegram;

pub use dhan::DhanMarketDataService;
pub use nse::NseSymbolUniverse;
pub use telegram::TelegramNotifier;
