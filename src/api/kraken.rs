// ============================================================================
// API Client : Kraken (API publique)
// ============================================================================
// Prix courant : GET /0/public/Ticker?pair=P      -> result[P].c[0]
// Historique   : GET /0/public/OHLC?pair=P&interval=I&since=S
//                -> result[P] = [[time, open, high, low, close, vwap, volume, count], ...]
//
// Kraken encode les prix en chaînes décimales ("45231.10000"). On lit la
// réponse en texte puis on la parse nous-mêmes, pour que toute réponse
// inattendue devienne une erreur de parsing qui nomme la paire.
// ============================================================================

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::api::MarketData;
use crate::error::{Result, TickerError};
use crate::models::{Interval, PricePoint};

pub const KRAKEN_API_URL: &str = "https://api.kraken.com/0/public";

const SECONDS_PER_DAY: i64 = 86_400;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("inkyticker/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Structures pour parser les réponses JSON de Kraken
// ============================================================================

/// Enveloppe commune : `error` non vide = requête refusée
#[derive(Debug, Deserialize)]
struct KrakenResponse<T> {
    #[serde(default)]
    error: Vec<String>,
    result: Option<T>,
}

/// Infos de ticker, on ne garde que `c` (dernier trade : [prix, volume])
#[derive(Debug, Deserialize)]
struct TickerInfo {
    c: Vec<String>,
}

/// Une ligne OHLC brute
/// 0 = time, 1 = open, 2 = high, 3 = low, 4 = close, 5 = vwap, 6 = volume, 7 = count
#[derive(Debug, Deserialize)]
struct OhlcRow(i64, String, String, String, String, String, String, i64);

// ============================================================================
// Client
// ============================================================================

/// Client HTTP pour l'API publique Kraken
#[derive(Debug, Clone)]
pub struct KrakenClient {
    http: reqwest::Client,
    base_url: String,
}

impl KrakenClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(KRAKEN_API_URL)
    }

    /// Client pointant vers une autre URL (miroir, serveur de test)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = build_http_client(USER_AGENT)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, pair: &str, url: &str) -> Result<String> {
        debug!(url = %url, "Sending HTTP request to Kraken");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| TickerError::Fetch {
                pair: pair.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Kraken renvoie ses erreurs métier en 200 avec `error` rempli ;
        // un autre statut est une erreur de transport
        let response = response.error_for_status().map_err(|source| {
            error!(status = %status, "Kraken returned error status");
            TickerError::Fetch {
                pair: pair.to_string(),
                source,
            }
        })?;

        response.text().await.map_err(|source| TickerError::Fetch {
            pair: pair.to_string(),
            source,
        })
    }
}

/// Échec ici = configuration TLS / en-têtes invalides, pas un problème réseau
fn build_http_client(user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| TickerError::output("http client", e))
}

#[async_trait]
impl MarketData for KrakenClient {
    #[instrument(skip(self))]
    async fn current_price(&self, pair: &str) -> Result<f64> {
        let url = build_ticker_url(&self.base_url, pair);
        let body = self.get_text(pair, &url).await?;
        let price = parse_ticker_body(pair, &body)?;
        info!(price, "Fetched current price");
        Ok(price)
    }

    #[instrument(skip(self, interval), fields(interval = %interval))]
    async fn historical_series(
        &self,
        pair: &str,
        range_days: u32,
        interval: Interval,
    ) -> Result<Vec<PricePoint>> {
        let since = chrono::Utc::now().timestamp() - SECONDS_PER_DAY * range_days as i64;
        let url = build_ohlc_url(&self.base_url, pair, interval, since);
        let body = self.get_text(pair, &url).await?;
        let series = parse_ohlc_body(pair, &body)?;
        info!(points = series.len(), "Fetched historical price data");
        Ok(series)
    }
}

// ============================================================================
// URLs et parsing (fonctions pures, testées sans réseau)
// ============================================================================

fn build_ticker_url(base_url: &str, pair: &str) -> String {
    format!("{}/Ticker?pair={}", base_url, pair)
}

fn build_ohlc_url(base_url: &str, pair: &str, interval: Interval, since: i64) -> String {
    format!(
        "{}/OHLC?pair={}&interval={}&since={}",
        base_url,
        pair,
        interval.minutes(),
        since
    )
}

/// Vérifie l'enveloppe et retourne `result`
fn unwrap_envelope<T>(pair: &str, response: KrakenResponse<T>) -> Result<T> {
    if !response.error.is_empty() {
        return Err(TickerError::parse(pair, response.error.join(", ")));
    }
    response
        .result
        .ok_or_else(|| TickerError::parse(pair, "missing `result` field"))
}

/// Cherche la série de la paire ; si la clé exacte manque mais qu'il n'y a
/// qu'une seule série (Kraken renomme parfois les paires, ex: XBTUSD -> XXBTZUSD),
/// on la prend
fn take_pair_entry<T>(pair: &str, mut result: HashMap<String, T>) -> Result<T> {
    if let Some(entry) = result.remove(pair) {
        return Ok(entry);
    }

    result.remove("last");
    if result.len() == 1 {
        if let Some((key, entry)) = result.into_iter().next() {
            warn!(requested = %pair, returned = %key, "Kraken returned the pair under another name");
            return Ok(entry);
        }
    }

    Err(TickerError::parse(pair, "asset pair not found in response"))
}

fn parse_decimal(pair: &str, field: &str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| TickerError::parse(pair, format!("{} {:?}: {}", field, text, e)))
}

fn parse_ticker_body(pair: &str, body: &str) -> Result<f64> {
    let response: KrakenResponse<HashMap<String, TickerInfo>> =
        serde_json::from_str(body).map_err(|e| TickerError::parse(pair, e.to_string()))?;
    let info = take_pair_entry(pair, unwrap_envelope(pair, response)?)?;

    let last = info
        .c
        .first()
        .ok_or_else(|| TickerError::parse(pair, "empty last-trade field"))?;
    parse_decimal(pair, "price", last)
}

fn parse_ohlc_body(pair: &str, body: &str) -> Result<Vec<PricePoint>> {
    let response: KrakenResponse<HashMap<String, Value>> =
        serde_json::from_str(body).map_err(|e| TickerError::parse(pair, e.to_string()))?;
    let rows = take_pair_entry(pair, unwrap_envelope(pair, response)?)?;

    let rows: Vec<OhlcRow> =
        serde_json::from_value(rows).map_err(|e| TickerError::parse(pair, e.to_string()))?;

    rows.into_iter()
        .map(|row| {
            Ok(PricePoint::new(
                row.0,
                parse_decimal(pair, "high", &row.2)?,
                parse_decimal(pair, "low", &row.3)?,
            ))
        })
        .collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TICKER_BODY: &str = r#"{
        "error": [],
        "result": {
            "XXBTZUSD": {
                "a": ["45232.00000", "1", "1.000"],
                "b": ["45231.90000", "1", "1.000"],
                "c": ["45231.10000", "0.00120000"]
            }
        }
    }"#;

    const OHLC_BODY: &str = r#"{
        "error": [],
        "result": {
            "XXBTZUSD": [
                [1616662740, "52591.9", "52599.9", "52591.8", "52599.9", "52599.1", "0.11091626", 5],
                [1616663040, "52600.0", "52650.5", "52580.1", "52640.0", "52610.3", "1.20000000", 12]
            ],
            "last": 1616663040
        }
    }"#;

    #[test]
    fn test_build_urls() {
        let url = build_ticker_url(KRAKEN_API_URL, "XXBTZUSD");
        assert_eq!(url, "https://api.kraken.com/0/public/Ticker?pair=XXBTZUSD");

        let url = build_ohlc_url(KRAKEN_API_URL, "XETHZEUR", Interval::H4, 1_600_000_000);
        assert!(url.contains("OHLC?pair=XETHZEUR"));
        assert!(url.contains("interval=240"));
        assert!(url.ends_with("since=1600000000"));
    }

    #[test]
    fn test_client_build_failure_names_the_client() {
        // Un saut de ligne est interdit dans un en-tête HTTP
        let err = build_http_client("inkyticker\n").unwrap_err();
        assert!(matches!(err, TickerError::Output { ref target, .. } if target == "http client"));
        assert!(err.to_string().contains("http client"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = KrakenClient::with_base_url("http://localhost:8080/0/public/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/0/public");
    }

    #[test]
    fn test_parse_ticker() {
        assert_eq!(parse_ticker_body("XXBTZUSD", TICKER_BODY).unwrap(), 45231.1);
    }

    #[test]
    fn test_parse_ohlc_keeps_time_high_low_in_order() {
        let series = parse_ohlc_body("XXBTZUSD", OHLC_BODY).unwrap();
        assert_eq!(
            series,
            vec![
                PricePoint::new(1616662740, 52599.9, 52591.8),
                PricePoint::new(1616663040, 52650.5, 52580.1),
            ]
        );
    }

    #[test]
    fn test_unknown_pair_is_parse_error() {
        let body = r#"{ "error": ["EQuery:Unknown asset pair"] }"#;
        let err = parse_ticker_body("FOOBAR", body).unwrap_err();
        assert!(matches!(err, TickerError::Parse { ref pair, .. } if pair == "FOOBAR"));
        assert!(err.to_string().contains("Unknown asset pair"));
    }

    #[test]
    fn test_renamed_pair_falls_back_to_single_series() {
        let series = parse_ohlc_body("XBTUSD", OHLC_BODY).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(parse_ticker_body("XXBTZUSD", "<html>").is_err());
        let body = r#"{ "error": [], "result": { "XXBTZUSD": { "c": ["abc"] } } }"#;
        assert!(matches!(
            parse_ticker_body("XXBTZUSD", body),
            Err(TickerError::Parse { .. })
        ));
        let body = r#"{ "error": [], "result": { "XXBTZUSD": [[1, "1", "2"]] } }"#;
        assert!(parse_ohlc_body("XXBTZUSD", body).is_err());
    }

    #[test]
    fn test_empty_history_parses_to_empty_series() {
        let body = r#"{ "error": [], "result": { "XXBTZUSD": [], "last": 0 } }"#;
        assert!(parse_ohlc_body("XXBTZUSD", body).unwrap().is_empty());
    }

    // Appel réel (peut échouer sans connexion : on ne fait que logger)
    #[tokio::test]
    async fn test_fetch_current_price() {
        let client = KrakenClient::new().unwrap();
        match client.current_price("XXBTZUSD").await {
            Ok(price) => {
                assert!(price > 0.0);
                println!("✓ Prix XXBTZUSD : {}", price);
            }
            Err(e) => {
                println!("⚠ Test skippé (pas de connexion?) : {}", e);
            }
        }
    }
}
