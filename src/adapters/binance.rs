use crate::domain::model::Candle;
use crate::utils::error::{HubError, Result};
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const PROVIDER: &str = "binance";
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com/api/v3";
pub const MAX_KLINE_LIMIT: usize = 1000;

/// Binance spot REST API, `/klines` only.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        if limit == 0 || limit > MAX_KLINE_LIMIT {
            return Err(HubError::invalid_input(
                "candle_limit",
                limit,
                format!("Value must be between 1 and {}", MAX_KLINE_LIMIT),
            ));
        }

        let url = format!("{}/klines", self.base_url);
        let limit = limit.to_string();
        tracing::debug!("Requesting candles: {} symbol={} interval={} limit={}", url, symbol, interval, limit);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("interval", interval), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HubError::market(
                PROVIDER,
                format!("HTTP {} for {}: {}", status, symbol, body.trim()),
            ));
        }

        let rows: Vec<Vec<Value>> = response
            .json()
            .await
            .map_err(|e| HubError::market(PROVIDER, format!("unexpected response body: {}", e)))?;

        rows.iter().map(|row| parse_kline(row)).collect()
    }
}

fn number(row: &[Value], index: usize, field: &str) -> Result<f64> {
    let value = row
        .get(index)
        .ok_or_else(|| HubError::market(PROVIDER, format!("kline missing {}", field)))?;

    // 價格欄位是字串，時間欄位是整數
    match value {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| HubError::market(PROVIDER, format!("kline {} is not numeric: {}", field, s))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| HubError::market(PROVIDER, format!("kline {} out of range", field))),
        other => Err(HubError::market(PROVIDER, format!("kline {} has unexpected type: {}", field, other))),
    }
}

/// `[open_time, open, high, low, close, volume, close_time, ...]`
pub fn parse_kline(row: &[Value]) -> Result<Candle> {
    let open_time_ms = row
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| HubError::market(PROVIDER, "kline open time is not an integer"))?;
    let open_time = DateTime::from_timestamp_millis(open_time_ms)
        .ok_or_else(|| HubError::market(PROVIDER, format!("kline open time out of range: {}", open_time_ms)))?;

    Ok(Candle {
        open_time,
        open: number(row, 1, "open")?,
        high: number(row, 2, "high")?,
        low: number(row, 3, "low")?,
        close: number(row, 4, "close")?,
        volume: number(row, 5, "volume")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_kline_row() {
        let row = json!([
            1_700_000_000_000i64, "37000.10", "37100.00", "36950.50", "37050.25", "12.5",
            1_700_003_599_999i64, "463128.1", 1200, "6.1", "226000.0", "0"
        ]);
        let candle = parse_kline(row.as_array().unwrap()).unwrap();
        assert_eq!(candle.open_time.timestamp(), 1_700_000_000);
        assert_eq!(candle.open, 37000.10);
        assert_eq!(candle.close, 37050.25);
        assert_eq!(candle.volume, 12.5);
    }

    #[test]
    fn test_parse_kline_rejects_bad_rows() {
        assert!(parse_kline(json!(["soon", "1", "1", "1", "1", "1"]).as_array().unwrap()).is_err());
        assert!(parse_kline(json!([1_700_000_000_000i64, "1", "1"]).as_array().unwrap()).is_err());
        assert!(parse_kline(json!([1_700_000_000_000i64, "x", "1", "1", "1", "1"]).as_array().unwrap()).is_err());
    }
}
