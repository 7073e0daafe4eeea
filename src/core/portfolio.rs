use crate::core::analytics::{self, CorrelationMatrix};
use crate::domain::model::{Candle, SpotPrices};
use crate::domain::ports::MarketData;
use crate::utils::error::{HubError, Result};
use crate::utils::format::{short_label, token_label};
use crate::utils::validation::{validate_input_range, Validate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const MAJOR_TOKENS: &[&str] = &["bitcoin", "ethereum", "binancecoin", "cardano", "solana", "polkadot"];
pub const STABLE_TOKENS: &[&str] = &["tether", "usd-coin", "dai", "busd"];
pub const DEFI_TOKENS: &[&str] = &["uniswap", "aave", "compound-governance-token", "chainlink"];
pub const DEFAULT_TOKENS: &[&str] = &["bitcoin", "ethereum"];

pub const PORTFOLIO_SIZE_RANGE: (f64, f64) = (100.0, 1_000_000.0);
pub const BENCHMARK_TOKEN: &str = "bitcoin";

/// Exchange symbol for a CoinGecko id, quoted in USDT.
///
/// Tether is the quote asset itself and has no symbol. Unknown ids fall back
/// to the upper-cased id without dashes.
pub fn binance_symbol(token_id: &str) -> Option<String> {
    let ticker = match token_id {
        "tether" => return None,
        "bitcoin" => "BTC",
        "ethereum" => "ETH",
        "binancecoin" => "BNB",
        "cardano" => "ADA",
        "solana" => "SOL",
        "polkadot" => "DOT",
        "usd-coin" => "USDC",
        "dai" => "DAI",
        "busd" => "BUSD",
        "uniswap" => "UNI",
        "aave" => "AAVE",
        "compound-governance-token" => "COMP",
        "chainlink" => "LINK",
        other => return Some(format!("{}USDT", other.to_uppercase().replace('-', ""))),
    };
    Some(format!("{}USDT", ticker))
}

/// 以 USDT 計價時價格恆定的資產
fn is_quote_asset(token_id: &str) -> bool {
    token_id == "tether"
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioSelection {
    pub major: Vec<String>,
    pub stable: Vec<String>,
    pub defi: Vec<String>,
}

impl PortfolioSelection {
    /// Selected tokens in category order, duplicates removed.
    /// An empty selection falls back to bitcoin + ethereum.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        for token in self.major.iter().chain(&self.stable).chain(&self.defi) {
            let token = token.trim().to_lowercase();
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        if tokens.is_empty() {
            DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect()
        } else {
            tokens
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub token: String,
    /// Allocation in whole percent, 0..=100
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioInput {
    pub holdings: Vec<Holding>,
    pub portfolio_size: f64,
}

impl PortfolioInput {
    /// Equal split (`100 / n`, integer division) with optional per-token overrides.
    pub fn from_selection(
        selection: &PortfolioSelection,
        overrides: &[(String, u32)],
        portfolio_size: f64,
    ) -> Result<Self> {
        let tokens = selection.tokens();
        let default_percent = 100 / tokens.len() as u32;
        let mut holdings: Vec<Holding> = tokens
            .into_iter()
            .map(|token| Holding {
                token,
                percent: default_percent,
            })
            .collect();

        for (token, percent) in overrides {
            let token = token.trim().to_lowercase();
            let holding = holdings
                .iter_mut()
                .find(|h| h.token == token)
                .ok_or_else(|| {
                    HubError::invalid_input("allocation", &token, "token is not part of the selected portfolio")
                })?;
            holding.percent = *percent;
        }

        let input = Self {
            holdings,
            portfolio_size,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.token.clone()).collect()
    }

    pub fn primary_token(&self) -> Option<&str> {
        self.holdings.first().map(|h| h.token.as_str())
    }

    pub fn allocation_total(&self) -> u32 {
        self.holdings.iter().map(|h| h.percent).sum()
    }

    /// 配置總和不是 100% 時只提示，不視為錯誤
    pub fn allocation_warning(&self) -> Option<String> {
        let total = self.allocation_total();
        (total != 100).then(|| format!("Total allocation: {}% (should be 100%)", total))
    }
}

impl Validate for PortfolioInput {
    fn validate(&self) -> Result<()> {
        validate_input_range(
            "portfolio_size",
            self.portfolio_size,
            PORTFOLIO_SIZE_RANGE.0,
            PORTFOLIO_SIZE_RANGE.1,
        )?;
        if self.holdings.is_empty() {
            return Err(HubError::invalid_input("tokens", "", "portfolio needs at least one token"));
        }
        for holding in &self.holdings {
            validate_input_range(&format!("allocation.{}", holding.token), holding.percent, 0, 100)?;
        }
        Ok(())
    }
}

/// Parse `token=percent`.
pub fn parse_allocation(value: &str) -> Result<(String, u32)> {
    let (token, percent) = value
        .split_once('=')
        .ok_or_else(|| HubError::invalid_input("allocation", value, "expected <token>=<percent>"))?;
    let percent = percent
        .trim()
        .parse::<u32>()
        .map_err(|_| HubError::invalid_input("allocation", value, "percent must be a whole number"))?;
    Ok((token.trim().to_lowercase(), percent))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingValue {
    pub token: String,
    pub label: String,
    pub percent: u32,
    pub spot_price: Option<f64>,
    pub value_usd: Option<f64>,
    pub units: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioValuation {
    pub holdings: Vec<HoldingValue>,
    pub total_value: f64,
    pub allocation_total: u32,
    pub allocation_warning: Option<String>,
    /// `false` when live prices were unavailable and the configured size is shown instead
    pub live: bool,
}

impl PortfolioValuation {
    pub fn unpriced_tokens(&self) -> Vec<&str> {
        self.holdings
            .iter()
            .filter(|h| h.spot_price.is_none())
            .map(|h| h.token.as_str())
            .collect()
    }
}

/// Value each holding at `size × percent / 100`. Tokens without a spot price
/// are listed but excluded from the total.
pub fn value_portfolio(input: &PortfolioInput, prices: &SpotPrices) -> PortfolioValuation {
    let holdings: Vec<HoldingValue> = input
        .holdings
        .iter()
        .map(|holding| {
            let spot_price = prices.get(&holding.token).copied();
            let value_usd = spot_price.map(|_| input.portfolio_size * holding.percent as f64 / 100.0);
            let units = match (value_usd, spot_price) {
                (Some(value), Some(price)) if price > 0.0 => Some(value / price),
                _ => None,
            };
            HoldingValue {
                token: holding.token.clone(),
                label: token_label(&holding.token),
                percent: holding.percent,
                spot_price,
                value_usd,
                units,
            }
        })
        .collect();

    PortfolioValuation {
        total_value: holdings.iter().filter_map(|h| h.value_usd).sum(),
        holdings,
        allocation_total: input.allocation_total(),
        allocation_warning: input.allocation_warning(),
        live: true,
    }
}

/// Valuation used when no live prices could be fetched.
pub fn demo_valuation(input: &PortfolioInput) -> PortfolioValuation {
    PortfolioValuation {
        holdings: input
            .holdings
            .iter()
            .map(|holding| HoldingValue {
                token: holding.token.clone(),
                label: token_label(&holding.token),
                percent: holding.percent,
                spot_price: None,
                value_usd: None,
                units: None,
            })
            .collect(),
        total_value: input.portfolio_size,
        allocation_total: input.allocation_total(),
        allocation_warning: input.allocation_warning(),
        live: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Live,
    /// Supplied by the caller
    Manual,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioPoint {
    pub year: i32,
    pub conservative: f64,
    pub optimistic: f64,
    pub pessimistic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub token: String,
    pub current_price: f64,
    pub price_source: PriceSource,
    pub points: Vec<ScenarioPoint>,
}

pub const CONSERVATIVE_GROWTH: f64 = 1.05;
pub const OPTIMISTIC_GROWTH: f64 = 1.15;
pub const PESSIMISTIC_GROWTH: f64 = 0.95;

/// Compound-growth scenarios for years `base_year + 1 ..= base_year + horizon`.
pub fn forecast_scenarios(current_price: f64, base_year: i32, horizon_years: u32) -> Vec<ScenarioPoint> {
    (1..=horizon_years as i32)
        .map(|k| ScenarioPoint {
            year: base_year.saturating_add(k),
            conservative: current_price * CONSERVATIVE_GROWTH.powi(k),
            optimistic: current_price * OPTIMISTIC_GROWTH.powi(k),
            pessimistic: current_price * PESSIMISTIC_GROWTH.powi(k),
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Number of aligned portfolio returns the metrics are based on
    pub observations: usize,
    pub change_24h_pct: Option<f64>,
    pub volatility_pct: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
    pub var_95_pct: Option<f64>,
    pub beta_vs_btc: Option<f64>,
}

fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Equity curve starting at 1.0 from a return series.
fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len() + 1);
    let mut level = 1.0;
    curve.push(level);
    for r in returns {
        level *= 1.0 + r;
        curve.push(level);
    }
    curve
}

/// Per-token return series for holdings that have history. The quote asset
/// gets a flat series so it still dilutes risk.
fn holding_returns(input: &PortfolioInput, candles: &BTreeMap<String, Vec<Candle>>) -> Vec<(String, f64, Vec<f64>)> {
    let longest = input
        .holdings
        .iter()
        .filter_map(|h| candles.get(&h.token))
        .map(|c| c.len().saturating_sub(1))
        .max()
        .unwrap_or(0);

    input
        .holdings
        .iter()
        .filter_map(|holding| {
            let returns = match candles.get(&holding.token) {
                Some(series) => analytics::simple_returns(&closes(series)),
                None if is_quote_asset(&holding.token) && longest > 0 => vec![0.0; longest],
                None => return None,
            };
            (!returns.is_empty()).then(|| (holding.token.clone(), holding.percent as f64, returns))
        })
        .collect()
}

pub fn compute_risk_metrics(
    input: &PortfolioInput,
    candles: &BTreeMap<String, Vec<Candle>>,
    interval: &str,
) -> Result<RiskMetrics> {
    let periods_per_year = analytics::periods_per_year(interval)?;
    let bars_per_day = (periods_per_year / 365.0).round() as usize;

    let series = holding_returns(input, candles);
    let weighted: Vec<(f64, &[f64])> = series.iter().map(|(_, w, r)| (*w, r.as_slice())).collect();
    let portfolio = analytics::weighted_returns(&weighted);
    if portfolio.is_empty() {
        return Ok(RiskMetrics::default());
    }

    let curve = equity_curve(&portfolio);
    // 24h 變動看主要代幣本身，不是加權後的組合
    let primary_change = input
        .primary_token()
        .and_then(|token| candles.get(token))
        .and_then(|series| analytics::change_pct(&closes(series), bars_per_day));
    let benchmark = candles
        .get(BENCHMARK_TOKEN)
        .map(|c| analytics::simple_returns(&closes(c)))
        .unwrap_or_default();

    Ok(RiskMetrics {
        observations: portfolio.len(),
        change_24h_pct: primary_change,
        volatility_pct: analytics::annualized_volatility_pct(&portfolio, periods_per_year),
        sharpe_ratio: analytics::sharpe_ratio(&portfolio, periods_per_year),
        max_drawdown_pct: analytics::max_drawdown_pct(&curve),
        var_95_pct: analytics::historical_var_pct(&portfolio, 0.95),
        beta_vs_btc: analytics::beta(&portfolio, &benchmark),
    })
}

/// Correlation across holdings with history; `None` below two series.
pub fn compute_correlation(
    input: &PortfolioInput,
    candles: &BTreeMap<String, Vec<Candle>>,
) -> Option<CorrelationMatrix> {
    let series: Vec<(String, Vec<f64>)> = holding_returns(input, candles)
        .into_iter()
        .map(|(token, _, returns)| (short_label(&token), returns))
        .collect();
    (series.len() > 1).then(|| analytics::correlation_matrix(&series))
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSettings {
    pub vs_currency: String,
    pub candle_interval: String,
    pub candle_limit: usize,
    pub forecast_base_year: i32,
    pub forecast_horizon_years: u32,
    pub fallback_price: f64,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            candle_interval: "1h".to_string(),
            candle_limit: 168,
            forecast_base_year: 2024,
            forecast_horizon_years: 6,
            fallback_price: 50_000.0,
        }
    }
}

/// Raw market data gathered for one portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub fetched_at: DateTime<Utc>,
    /// `None` when the price feed failed
    pub prices: Option<SpotPrices>,
    /// Candles keyed by token id; the benchmark is always requested
    pub candles: BTreeMap<String, Vec<Candle>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub generated_at: DateTime<Utc>,
    pub valuation: PortfolioValuation,
    pub risk: RiskMetrics,
    pub correlation: Option<CorrelationMatrix>,
    pub forecast: Option<Forecast>,
    pub primary_token: Option<String>,
    pub primary_candles: Vec<Candle>,
    pub warnings: Vec<String>,
}

pub struct PortfolioAnalyzer<M: MarketData> {
    market: M,
    settings: PortfolioSettings,
}

impl<M: MarketData> PortfolioAnalyzer<M> {
    pub fn new(market: M, settings: PortfolioSettings) -> Self {
        Self { market, settings }
    }

    pub fn settings(&self) -> &PortfolioSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PortfolioSettings) {
        self.settings = settings;
    }

    /// 抓取價格與 K 線；行情來源失敗只記錄警告，不中斷流程
    pub async fn fetch_snapshot(&self, input: &PortfolioInput) -> MarketSnapshot {
        let tokens = input.tokens();

        let prices = match self.market.spot_prices(&tokens, &self.settings.vs_currency).await {
            Ok(prices) => {
                tracing::debug!("Fetched {} spot prices", prices.len());
                Some(prices)
            }
            Err(e) => {
                tracing::warn!("⚠️ Unable to fetch live prices, using demo data: {}", e);
                None
            }
        };

        let mut wanted = tokens;
        if !wanted.iter().any(|t| t == BENCHMARK_TOKEN) {
            wanted.push(BENCHMARK_TOKEN.to_string());
        }

        let mut candles = BTreeMap::new();
        for token in wanted {
            let Some(symbol) = binance_symbol(&token) else {
                continue;
            };
            match self
                .market
                .candles(&symbol, &self.settings.candle_interval, self.settings.candle_limit)
                .await
            {
                Ok(series) if !series.is_empty() => {
                    candles.insert(token, series);
                }
                Ok(_) => tracing::debug!("No candles returned for {}", symbol),
                Err(e) => tracing::warn!("⚠️ No price history for {} ({}): {}", token, symbol, e),
            }
        }

        MarketSnapshot {
            fetched_at: Utc::now(),
            prices,
            candles,
        }
    }

    pub fn build_report(&self, input: &PortfolioInput, snapshot: &MarketSnapshot) -> Result<PortfolioReport> {
        let mut warnings = Vec::new();

        let valuation = match &snapshot.prices {
            Some(prices) => value_portfolio(input, prices),
            None => {
                warnings.push("Unable to fetch live prices. Using demo data.".to_string());
                demo_valuation(input)
            }
        };
        if let Some(warning) = &valuation.allocation_warning {
            warnings.push(warning.clone());
        }
        if valuation.live {
            let unpriced = valuation.unpriced_tokens();
            if !unpriced.is_empty() {
                warnings.push(format!("No live price for: {}", unpriced.join(", ")));
            }
        }

        let risk = compute_risk_metrics(input, &snapshot.candles, &self.settings.candle_interval)?;
        let correlation = compute_correlation(input, &snapshot.candles);

        let primary_token = input.primary_token().map(str::to_string);
        let forecast = primary_token.as_ref().map(|token| {
            let live = snapshot.prices.as_ref().and_then(|p| p.get(token)).copied();
            match live {
                Some(price) => self.scenarios(token, price, PriceSource::Live),
                None => self.scenarios(token, self.settings.fallback_price, PriceSource::Fallback),
            }
        });

        let primary_candles = primary_token
            .as_ref()
            .and_then(|t| snapshot.candles.get(t))
            .cloned()
            .unwrap_or_default();

        Ok(PortfolioReport {
            generated_at: snapshot.fetched_at,
            valuation,
            risk,
            correlation,
            forecast,
            primary_token,
            primary_candles,
            warnings,
        })
    }

    fn scenarios(&self, token: &str, current_price: f64, price_source: PriceSource) -> Forecast {
        Forecast {
            token: token.to_string(),
            current_price,
            price_source,
            points: forecast_scenarios(
                current_price,
                self.settings.forecast_base_year,
                self.settings.forecast_horizon_years,
            ),
        }
    }

    /// Scenarios for a single token. Uses `price` when given, otherwise the
    /// live spot price, otherwise the configured fallback.
    pub async fn forecast(&self, token: &str, price: Option<f64>) -> Result<Forecast> {
        if let Some(price) = price {
            if !(price > 0.0) {
                return Err(HubError::invalid_input("price", price, "price must be greater than 0"));
            }
            return Ok(self.scenarios(token, price, PriceSource::Manual));
        }

        let ids = [token.to_string()];
        match self.market.spot_prices(&ids, &self.settings.vs_currency).await {
            Ok(prices) => match prices.get(token) {
                Some(price) => Ok(self.scenarios(token, *price, PriceSource::Live)),
                None => {
                    tracing::warn!("⚠️ No live price for {}, using fallback", token);
                    Ok(self.scenarios(token, self.settings.fallback_price, PriceSource::Fallback))
                }
            },
            Err(e) => {
                tracing::warn!("⚠️ Unable to fetch live price for {}: {}", token, e);
                Ok(self.scenarios(token, self.settings.fallback_price, PriceSource::Fallback))
            }
        }
    }

    pub async fn analyze(&self, input: &PortfolioInput) -> Result<PortfolioReport> {
        let snapshot = self.fetch_snapshot(input).await;
        self.build_report(input, &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn candles_from(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                open_time: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            })
            .collect()
    }

    struct StaticMarket {
        prices: Option<SpotPrices>,
        closes: BTreeMap<String, Vec<f64>>,
    }

    #[async_trait]
    impl MarketData for StaticMarket {
        async fn spot_prices(&self, token_ids: &[String], _vs: &str) -> Result<SpotPrices> {
            let prices = self
                .prices
                .clone()
                .ok_or_else(|| HubError::market("static", "price feed down"))?;
            Ok(prices.into_iter().filter(|(k, _)| token_ids.contains(k)).collect())
        }

        async fn candles(&self, symbol: &str, _interval: &str, _limit: usize) -> Result<Vec<Candle>> {
            self.closes
                .get(symbol)
                .map(|c| candles_from(c))
                .ok_or_else(|| HubError::market("static", format!("unknown symbol {}", symbol)))
        }
    }

    #[test]
    fn test_selection_defaults_and_dedup() {
        assert_eq!(PortfolioSelection::default().tokens(), vec!["bitcoin", "ethereum"]);

        let selection = PortfolioSelection {
            major: vec!["bitcoin".into(), "Ethereum".into()],
            stable: vec!["usd-coin".into(), "bitcoin".into()],
            defi: vec![],
        };
        assert_eq!(selection.tokens(), vec!["bitcoin", "ethereum", "usd-coin"]);
    }

    #[test]
    fn test_equal_split_uses_integer_division() {
        let selection = PortfolioSelection {
            major: vec!["bitcoin".into(), "ethereum".into()],
            stable: vec!["usd-coin".into()],
            defi: vec![],
        };
        let input = PortfolioInput::from_selection(&selection, &[], 10_000.0).unwrap();
        assert!(input.holdings.iter().all(|h| h.percent == 33));
        assert_eq!(input.allocation_total(), 99);
        assert_eq!(
            input.allocation_warning().as_deref(),
            Some("Total allocation: 99% (should be 100%)")
        );
    }

    #[test]
    fn test_overrides_and_validation() {
        let selection = PortfolioSelection::default();
        let overrides = vec![("bitcoin".to_string(), 60), ("ethereum".to_string(), 40)];
        let input = PortfolioInput::from_selection(&selection, &overrides, 5_000.0).unwrap();
        assert_eq!(input.allocation_total(), 100);
        assert!(input.allocation_warning().is_none());

        let unknown = vec![("dogecoin".to_string(), 10)];
        assert!(PortfolioInput::from_selection(&selection, &unknown, 5_000.0).is_err());

        let too_much = vec![("bitcoin".to_string(), 101)];
        assert!(PortfolioInput::from_selection(&selection, &too_much, 5_000.0).is_err());

        assert!(PortfolioInput::from_selection(&selection, &[], 99.0).is_err());
        assert!(PortfolioInput::from_selection(&selection, &[], 1_000_001.0).is_err());
    }

    #[test]
    fn test_parse_allocation() {
        assert_eq!(parse_allocation("bitcoin=60").unwrap(), ("bitcoin".to_string(), 60));
        assert_eq!(parse_allocation(" USD-Coin = 5 ").unwrap(), ("usd-coin".to_string(), 5));
        assert!(parse_allocation("bitcoin").is_err());
        assert!(parse_allocation("bitcoin=sixty").is_err());
    }

    #[test]
    fn test_binance_symbols() {
        assert_eq!(binance_symbol("bitcoin").as_deref(), Some("BTCUSDT"));
        assert_eq!(binance_symbol("compound-governance-token").as_deref(), Some("COMPUSDT"));
        assert_eq!(binance_symbol("tether"), None);
        assert_eq!(binance_symbol("shiba-inu").as_deref(), Some("SHIBAINUUSDT"));
    }

    #[test]
    fn test_value_portfolio_skips_unpriced_tokens() {
        let selection = PortfolioSelection {
            major: vec!["bitcoin".into(), "ethereum".into()],
            stable: vec![],
            defi: vec!["aave".into()],
        };
        let overrides = vec![
            ("bitcoin".to_string(), 50),
            ("ethereum".to_string(), 30),
            ("aave".to_string(), 20),
        ];
        let input = PortfolioInput::from_selection(&selection, &overrides, 10_000.0).unwrap();
        let prices: SpotPrices = [("bitcoin".to_string(), 50_000.0), ("ethereum".to_string(), 2_500.0)]
            .into_iter()
            .collect();

        let valuation = value_portfolio(&input, &prices);
        assert!(valuation.live);
        assert!(approx(valuation.total_value, 8_000.0));
        assert!(approx(valuation.holdings[0].units.unwrap(), 0.1));
        assert!(approx(valuation.holdings[1].units.unwrap(), 1.2));
        assert_eq!(valuation.unpriced_tokens(), vec!["aave"]);
        assert_eq!(valuation.holdings[2].label, "Aave");
    }

    #[test]
    fn test_forecast_scenarios() {
        let points = forecast_scenarios(100.0, 2024, 6);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].year, 2025);
        assert_eq!(points[5].year, 2030);
        assert!(approx(points[0].conservative, 105.0));
        assert!(approx(points[0].optimistic, 115.0));
        assert!(approx(points[0].pessimistic, 95.0));
        assert!(approx(points[1].optimistic, 132.25));

        let far = forecast_scenarios(100.0, i32::MAX, 2);
        assert_eq!(far[1].year, i32::MAX);
    }

    #[test]
    fn test_risk_metrics_with_flat_stablecoin() {
        let selection = PortfolioSelection {
            major: vec!["bitcoin".into()],
            stable: vec!["tether".into()],
            defi: vec![],
        };
        let input = PortfolioInput::from_selection(&selection, &[], 10_000.0).unwrap();

        let btc: Vec<f64> = (0..49).map(|i| 100.0 + if i % 2 == 0 { 0.0 } else { 2.0 }).collect();
        let mut candles = BTreeMap::new();
        candles.insert("bitcoin".to_string(), candles_from(&btc));

        let risk = compute_risk_metrics(&input, &candles, "1h").unwrap();
        assert_eq!(risk.observations, 48);
        // 一半是穩定幣，相對 BTC 的 beta 為 0.5
        assert!(approx(risk.beta_vs_btc.unwrap(), 0.5));
        assert!(risk.volatility_pct.unwrap() > 0.0);
        assert!(risk.max_drawdown_pct.unwrap() > 0.0);
        assert!(risk.change_24h_pct.is_some());

        let correlation = compute_correlation(&input, &candles).unwrap();
        assert_eq!(correlation.labels, vec!["bitcoin", "tether"]);
        assert!(approx(correlation.values[0][1], 0.0));
    }

    #[test]
    fn test_24h_change_follows_primary_token() {
        let input = PortfolioInput::from_selection(&PortfolioSelection::default(), &[], 10_000.0).unwrap();
        let mut candles = BTreeMap::new();
        candles.insert("bitcoin".to_string(), candles_from(&[100.0, 110.0]));
        candles.insert("ethereum".to_string(), candles_from(&[100.0, 90.0]));

        // 50/50 組合持平，但 bitcoin 漲了 10%
        let risk = compute_risk_metrics(&input, &candles, "1d").unwrap();
        assert_eq!(risk.observations, 1);
        assert!(approx(risk.change_24h_pct.unwrap(), 10.0));
        assert!(approx(risk.max_drawdown_pct.unwrap_or(0.0), 0.0));

        candles.remove("bitcoin");
        let risk = compute_risk_metrics(&input, &candles, "1d").unwrap();
        assert!(risk.change_24h_pct.is_none());
    }

    #[test]
    fn test_risk_metrics_without_history_are_empty() {
        let input = PortfolioInput::from_selection(&PortfolioSelection::default(), &[], 10_000.0).unwrap();
        let risk = compute_risk_metrics(&input, &BTreeMap::new(), "1h").unwrap();
        assert_eq!(risk, RiskMetrics::default());
        assert!(compute_correlation(&input, &BTreeMap::new()).is_none());
    }

    #[tokio::test]
    async fn test_analyze_falls_back_to_demo_when_prices_fail() {
        let mut closes = BTreeMap::new();
        closes.insert("BTCUSDT".to_string(), vec![100.0, 101.0, 99.0, 102.0]);
        let market = StaticMarket {
            prices: None,
            closes,
        };
        let analyzer = PortfolioAnalyzer::new(market, PortfolioSettings::default());
        let input = PortfolioInput::from_selection(&PortfolioSelection::default(), &[], 10_000.0).unwrap();

        let report = analyzer.analyze(&input).await.unwrap();
        assert!(!report.valuation.live);
        assert!(approx(report.valuation.total_value, 10_000.0));
        assert_eq!(report.warnings[0], "Unable to fetch live prices. Using demo data.");

        let forecast = report.forecast.unwrap();
        assert_eq!(forecast.token, "bitcoin");
        assert_eq!(forecast.price_source, PriceSource::Fallback);
        assert!(approx(forecast.current_price, 50_000.0));
        assert_eq!(report.primary_candles.len(), 4);
    }

    #[tokio::test]
    async fn test_analyze_fetches_benchmark_for_altcoin_portfolio() {
        let mut closes = BTreeMap::new();
        closes.insert("BTCUSDT".to_string(), vec![100.0, 102.0, 101.0, 104.0, 103.0]);
        closes.insert("SOLUSDT".to_string(), vec![20.0, 20.8, 20.4, 21.6, 21.2]);
        let prices: SpotPrices = [("solana".to_string(), 21.2), ("bitcoin".to_string(), 103.0)]
            .into_iter()
            .collect();
        let market = StaticMarket {
            prices: Some(prices),
            closes,
        };
        let analyzer = PortfolioAnalyzer::new(market, PortfolioSettings::default());
        let selection = PortfolioSelection {
            major: vec!["solana".into()],
            ..Default::default()
        };
        let input = PortfolioInput::from_selection(&selection, &[], 1_000.0).unwrap();

        let report = analyzer.analyze(&input).await.unwrap();
        assert!(report.valuation.live);
        assert!(approx(report.valuation.total_value, 1_000.0));
        assert!(report.risk.beta_vs_btc.is_some());
        // 只有一個資產，沒有相關矩陣
        assert!(report.correlation.is_none());
        assert_eq!(report.forecast.unwrap().price_source, PriceSource::Live);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_single_token_forecast_sources() {
        let prices: SpotPrices = [("ethereum".to_string(), 2_000.0)].into_iter().collect();
        let market = StaticMarket {
            prices: Some(prices),
            closes: BTreeMap::new(),
        };
        let analyzer = PortfolioAnalyzer::new(market, PortfolioSettings::default());

        let live = analyzer.forecast("ethereum", None).await.unwrap();
        assert_eq!(live.price_source, PriceSource::Live);
        assert!(approx(live.points[0].conservative, 2_100.0));

        let manual = analyzer.forecast("ethereum", Some(10.0)).await.unwrap();
        assert_eq!(manual.price_source, PriceSource::Manual);
        assert_eq!(manual.points.len(), 6);

        let fallback = analyzer.forecast("solana", None).await.unwrap();
        assert_eq!(fallback.price_source, PriceSource::Fallback);
        assert!(approx(fallback.current_price, 50_000.0));

        assert!(analyzer.forecast("ethereum", Some(0.0)).await.is_err());
    }
}
