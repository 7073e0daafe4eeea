use cloud_crypto_hub::adapters::{BinanceClient, CachedMarketData, CoinGeckoClient, LiveMarketData};
use cloud_crypto_hub::domain::ports::MarketData;
use cloud_crypto_hub::HubError;
use httpmock::prelude::*;
use std::time::Duration;

fn kline(open_time_ms: i64, close: &str) -> serde_json::Value {
    serde_json::json!([
        open_time_ms, "100.0", "110.0", "95.0", close, "12.5",
        open_time_ms + 3_599_999, "1250.0", 42, "6.0", "600.0", "0"
    ])
}

#[tokio::test]
async fn test_coingecko_simple_price() {
    let server = MockServer::start();
    let price_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/simple/price")
            .query_param("ids", "bitcoin,ethereum,not-a-coin")
            .query_param("vs_currencies", "usd");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "bitcoin": {"usd": 64000.5},
                "ethereum": {"usd": 3100}
            }));
    });

    let client = CoinGeckoClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    let ids = vec!["bitcoin".to_string(), "ethereum".to_string(), "not-a-coin".to_string()];
    let prices = client.simple_price(&ids, "usd").await.unwrap();

    price_mock.assert();
    assert_eq!(prices.len(), 2);
    assert_eq!(prices["bitcoin"], 64000.5);
    assert_eq!(prices["ethereum"], 3100.0);
    assert!(!prices.contains_key("not-a-coin"));
}

#[tokio::test]
async fn test_coingecko_rate_limit_is_market_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/simple/price");
        then.status(429).body("Too Many Requests");
    });

    let client = CoinGeckoClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    let err = client.simple_price(&["bitcoin".to_string()], "usd").await.unwrap_err();

    match &err {
        HubError::MarketDataError { provider, message } => {
            assert_eq!(provider, "coingecko");
            assert!(message.contains("429"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.recovery_suggestion().contains("--offline"));
}

#[tokio::test]
async fn test_coingecko_empty_ids_skip_request() {
    let server = MockServer::start();
    let price_mock = server.mock(|when, then| {
        when.method(GET).path("/simple/price");
        then.status(200).json_body(serde_json::json!({}));
    });

    let client = CoinGeckoClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    assert!(client.simple_price(&[], "usd").await.unwrap().is_empty());
    price_mock.assert_hits(0);
}

#[tokio::test]
async fn test_binance_klines() {
    let server = MockServer::start();
    let kline_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/klines")
            .query_param("symbol", "BTCUSDT")
            .query_param("interval", "1h")
            .query_param("limit", "2");
        then.status(200).json_body(serde_json::json!([
            kline(1_700_000_000_000, "101.5"),
            kline(1_700_003_600_000, "102.25"),
        ]));
    });

    let client = BinanceClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    let candles = client.klines("BTCUSDT", "1h", 2).await.unwrap();

    kline_mock.assert();
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].close, 101.5);
    assert_eq!(candles[1].close, 102.25);
    assert_eq!(candles[1].open_time.timestamp(), 1_700_003_600);
    assert_eq!(candles[0].volume, 12.5);
}

#[tokio::test]
async fn test_binance_invalid_symbol() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/klines");
        then.status(400)
            .json_body(serde_json::json!({"code": -1121, "msg": "Invalid symbol."}));
    });

    let client = BinanceClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    let err = client.klines("NOPEUSDT", "1h", 10).await.unwrap_err();
    assert!(err.to_string().contains("Invalid symbol"));

    // 超出交易所上限的 limit 不會送出請求
    assert!(matches!(
        client.klines("BTCUSDT", "1h", 5_000).await,
        Err(HubError::InvalidInputError { .. })
    ));
}

#[tokio::test]
async fn test_cached_live_market_hits_each_endpoint_once() {
    let server = MockServer::start();
    let price_mock = server.mock(|when, then| {
        when.method(GET).path("/simple/price");
        then.status(200)
            .json_body(serde_json::json!({"bitcoin": {"usd": 64000.0}}));
    });
    let kline_mock = server.mock(|when, then| {
        when.method(GET).path("/klines");
        then.status(200)
            .json_body(serde_json::json!([kline(1_700_000_000_000, "100.0")]));
    });

    let live = LiveMarketData::new(&server.base_url(), &server.base_url(), Duration::from_secs(5)).unwrap();
    let market = CachedMarketData::new(live, Duration::from_secs(15), Duration::from_secs(60));
    let ids = vec!["bitcoin".to_string()];

    for _ in 0..3 {
        assert_eq!(market.spot_prices(&ids, "usd").await.unwrap()["bitcoin"], 64000.0);
        assert_eq!(market.candles("BTCUSDT", "1h", 1).await.unwrap().len(), 1);
    }

    price_mock.assert_hits(1);
    kline_mock.assert_hits(1);
}
