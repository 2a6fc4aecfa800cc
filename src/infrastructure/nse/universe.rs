//! NIFTY 50 constituents plus F&O underlyings from the NSE website API.
//!
//! NSE rejects API calls without the cookies set by a prior visit to the home
//! page, so every fetch opens a fresh cookie session first.

use crate::domain::errors::UniverseError;
use crate::domain::ports::SymbolUniverseProvider;
use crate::infrastructure::core::HttpClientFactory;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub const NSE_BASE_URL: &str = "https://www.nseindia.com";
const INDEX_PATH: &str = "/api/equity-stockIndices?index=NIFTY%2050";
const DERIVATIVES_PATH: &str = "/api/liveEquity-derivatives";

#[derive(Debug, Deserialize)]
struct NseResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IndexConstituent {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct DerivativeContract {
    underlying: String,
}

pub struct NseSymbolUniverse {
    base_url: String,
}

impl NseSymbolUniverse {
    pub fn new() -> Self {
        Self::with_base_url(NSE_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_text(&self, client: &Client, path: &str) -> Result<String, UniverseError> {
        let url = format!("{}{}", self.base_url, path);
        let response = client
            .get(&url)
            .send()
            .map_err(|e| UniverseError::ConnectionLost {
                reason: format!("{}: {}", url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UniverseError::HttpStatus {
                endpoint: url,
                status: status.as_u16(),
            });
        }

        response.text().map_err(|e| UniverseError::ConnectionLost {
            reason: format!("{}: {}", url, e),
        })
    }
}

impl Default for NseSymbolUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolUniverseProvider for NseSymbolUniverse {
    fn fetch_symbols(&self) -> Result<Vec<String>, UniverseError> {
        let client = HttpClientFactory::create_browser_session(&format!("{}/", self.base_url));

        // Landing page sets the session cookies
        self.get_text(&client, "/")?;

        let index = parse_index_symbols(&self.get_text(&client, INDEX_PATH)?)?;
        let derivatives = parse_derivative_underlyings(&self.get_text(&client, DERIVATIVES_PATH)?)?;
        debug!(
            "NSE returned {} index rows and {} derivative rows",
            index.len(),
            derivatives.len()
        );

        let symbols = merge_universe(index, derivatives);
        info!("Symbol universe: {} symbols", symbols.len());
        Ok(symbols)
    }
}

fn parse_data<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<Vec<T>, UniverseError> {
    serde_json::from_str::<NseResponse<T>>(body)
        .map(|response| response.data)
        .map_err(|e| UniverseError::InvalidPayload {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
}

/// Extracts `symbol` from each record of the index-constituents payload.
pub fn parse_index_symbols(body: &str) -> Result<Vec<String>, UniverseError> {
    Ok(parse_data::<IndexConstituent>(INDEX_PATH, body)?
        .into_iter()
        .map(|record| record.symbol)
        .collect())
}

/// Extracts `underlying` from each record of the derivatives payload.
pub fn parse_derivative_underlyings(body: &str) -> Result<Vec<String>, UniverseError> {
    Ok(parse_data::<DerivativeContract>(DERIVATIVES_PATH, body)?
        .into_iter()
        .map(|record| record.underlying)
        .collect())
}

/// Union of both lists, trimmed, without blanks or duplicates, sorted ascending.
pub fn merge_universe(index: Vec<String>, derivatives: Vec<String>) -> Vec<String> {
    index
        .into_iter()
        .chain(derivatives)
        .map(|symbol| symbol.trim().to_string())
        .filter(|symbol| !symbol.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_dedups_and_sorts() {
        let merged = merge_universe(
            strings(&["TCS", "INFY", "RELIANCE"]),
            strings(&["SBIN", "INFY", "TCS", "ABB", "SBIN"]),
        );

        assert_eq!(merged, strings(&["ABB", "INFY", "RELIANCE", "SBIN", "TCS"]));
    }

    #[test]
    fn test_merge_drops_blanks_and_trims() {
        let merged = merge_universe(strings(&[" TCS ", ""]), strings(&["TCS", "  "]));
        assert_eq!(merged, strings(&["TCS"]));
    }

    #[test]
    fn test_merge_of_empty_lists() {
        assert!(merge_universe(vec![], vec![]).is_empty());
    }

    #[test]
    fn test_parse_index_symbols() {
        let body = json!({
            "name": "NIFTY 50",
            "data": [
                { "symbol": "RELIANCE", "lastPrice": 2900.5 },
                { "symbol": "HDFCBANK", "lastPrice": 1450.0 }
            ]
        })
        .to_string();

        assert_eq!(parse_index_symbols(&body).unwrap(), strings(&["RELIANCE", "HDFCBANK"]));
    }

    #[test]
    fn test_parse_derivative_underlyings() {
        let body = json!({
            "data": [
                { "underlying": "NIFTY", "instrumentType": "Index Futures" },
                { "underlying": "SBIN", "instrumentType": "Stock Options" },
                { "underlying": "SBIN", "instrumentType": "Stock Futures" }
            ]
        })
        .to_string();

        assert_eq!(
            parse_derivative_underlyings(&body).unwrap(),
            strings(&["NIFTY", "SBIN", "SBIN"])
        );
    }

    #[test]
    fn test_parse_rejects_records_without_field() {
        let body = json!({ "data": [{ "identifier": "X" }] }).to_string();
        assert!(matches!(
            parse_index_symbols(&body),
            Err(UniverseError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_unreachable_host_degrades_to_empty() {
        let universe = NseSymbolUniverse::with_base_url("http://127.0.0.1:9");
        assert!(universe.symbols_or_empty().is_empty());
    }
}
