//! Telegram alert delivery.

pub mod notifier;

pub use notifier::TelegramNotifier;
