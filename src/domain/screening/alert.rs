pub const ALERT_HEADER: &str = "🔔 *Screener Alerts (Nifty 50 + F&O):*";

/// Header line followed by one symbol per line, in the given order.
/// Returns `None` when there is nothing to report.
pub fn format_alert(symbols: &[String]) -> Option<String> {
    if symbols.is_empty() {
        return None;
    }

    let mut message = String::from(ALERT_HEADER);
    for symbol in symbols {
        message.push('\n');
        message.push_str(symbol);
    }
    Some(message)
}
