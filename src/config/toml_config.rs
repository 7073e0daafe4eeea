use crate::adapters::{binance, coingecko};
use crate::core::analytics;
use crate::core::portfolio::PortfolioSettings;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{HubError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BUNDLE_NAME: &str = "hub_snapshot.zip";

/// Settings file. Every section and field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub market: MarketConfig,
    pub portfolio: PortfolioConfig,
    pub payments: PaymentsConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub coingecko_base_url: String,
    pub binance_base_url: String,
    pub vs_currency: String,
    pub timeout_seconds: u64,
    pub price_cache_ttl_seconds: u64,
    pub candle_cache_ttl_seconds: u64,
    /// Skip all network calls and use demo data
    pub offline: bool,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            coingecko_base_url: coingecko::DEFAULT_BASE_URL.to_string(),
            binance_base_url: binance::DEFAULT_BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            timeout_seconds: 8,
            price_cache_ttl_seconds: 15,
            candle_cache_ttl_seconds: 60,
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub candle_interval: String,
    pub candle_limit: usize,
    pub forecast_base_year: i32,
    pub forecast_horizon_years: u32,
    pub fallback_price: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        let defaults = PortfolioSettings::default();
        Self {
            candle_interval: defaults.candle_interval,
            candle_limit: defaults.candle_limit,
            forecast_base_year: defaults.forecast_base_year,
            forecast_horizon_years: defaults.forecast_horizon_years,
            fallback_price: defaults.fallback_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    pub heatmap_seed: u64,
    pub heatmap_base_rate: f64,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            heatmap_seed: 42,
            heatmap_base_rate: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub bundle_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            bundle_name: DEFAULT_BUNDLE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub verbose: bool,
    pub json_logs: bool,
}

impl HubConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HubError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HubError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COINGECKO_URL})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HubError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.market.timeout_seconds)
    }

    pub fn price_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.market.price_cache_ttl_seconds)
    }

    pub fn candle_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.market.candle_cache_ttl_seconds)
    }

    pub fn portfolio_settings(&self) -> PortfolioSettings {
        PortfolioSettings {
            vs_currency: self.market.vs_currency.clone(),
            candle_interval: self.portfolio.candle_interval.clone(),
            candle_limit: self.portfolio.candle_limit,
            forecast_base_year: self.portfolio.forecast_base_year,
            forecast_horizon_years: self.portfolio.forecast_horizon_years,
            fallback_price: self.portfolio.fallback_price,
        }
    }

    pub fn bundle_name(&self) -> &str {
        &self.output.bundle_name
    }

    pub fn heatmap_base_rate(&self) -> f64 {
        self.payments.heatmap_base_rate
    }
}

impl ConfigProvider for HubConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn vs_currency(&self) -> &str {
        &self.market.vs_currency
    }

    fn candle_interval(&self) -> &str {
        &self.portfolio.candle_interval
    }

    fn candle_limit(&self) -> usize {
        self.portfolio.candle_limit
    }

    fn heatmap_seed(&self) -> u64 {
        self.payments.heatmap_seed
    }
}

impl Validate for HubConfig {
    fn validate(&self) -> Result<()> {
        if !self.market.offline {
            validate_url("market.coingecko_base_url", &self.market.coingecko_base_url)?;
            validate_url("market.binance_base_url", &self.market.binance_base_url)?;
        }
        validate_non_empty_string("market.vs_currency", &self.market.vs_currency)?;
        validate_positive_number("market.timeout_seconds", self.market.timeout_seconds, 1)?;

        analytics::periods_per_year(&self.portfolio.candle_interval).map_err(|_| {
            HubError::InvalidConfigValueError {
                field: "portfolio.candle_interval".to_string(),
                value: self.portfolio.candle_interval.clone(),
                reason: "Expected a number followed by m, h, d or w (e.g. 1h)".to_string(),
            }
        })?;
        validate_range(
            "portfolio.candle_limit",
            self.portfolio.candle_limit,
            2,
            binance::MAX_KLINE_LIMIT,
        )?;
        validate_range("portfolio.forecast_base_year", self.portfolio.forecast_base_year, 1970, 9999)?;
        validate_range("portfolio.forecast_horizon_years", self.portfolio.forecast_horizon_years, 1, 50)?;
        if !(self.portfolio.fallback_price > 0.0) {
            return Err(HubError::InvalidConfigValueError {
                field: "portfolio.fallback_price".to_string(),
                value: self.portfolio.fallback_price.to_string(),
                reason: "Value must be greater than 0".to_string(),
            });
        }

        validate_range("payments.heatmap_base_rate", self.payments.heatmap_base_rate, 1.0, 10_000.0)?;

        validate_path("output.output_path", &self.output.output_path)?;
        validate_non_empty_string("output.bundle_name", &self.output.bundle_name)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = HubConfig::from_toml_str("").unwrap();

        assert_eq!(config.market.timeout_seconds, 8);
        assert_eq!(config.price_cache_ttl(), Duration::from_secs(15));
        assert_eq!(config.candle_cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.candle_interval(), "1h");
        assert_eq!(config.candle_limit(), 168);
        assert_eq!(config.heatmap_seed(), 42);
        assert_eq!(config.bundle_name(), "hub_snapshot.zip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_content = r#"
[market]
vs_currency = "eur"
offline = true

[portfolio]
candle_interval = "1d"
candle_limit = 90

[output]
output_path = "./snapshots"
"#;

        let config = HubConfig::from_toml_str(toml_content).unwrap();
        let settings = config.portfolio_settings();

        assert_eq!(settings.vs_currency, "eur");
        assert_eq!(settings.candle_interval, "1d");
        assert_eq!(settings.candle_limit, 90);
        assert_eq!(settings.forecast_horizon_years, 6);
        assert!(config.market.offline);
        assert_eq!(config.output_path(), "./snapshots");
        assert_eq!(config.market.timeout_seconds, 8);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HUB_TEST_BINANCE_URL", "https://binance.test/api/v3");

        let toml_content = r#"
[market]
binance_base_url = "${HUB_TEST_BINANCE_URL}"
coingecko_base_url = "${HUB_TEST_UNSET_VAR}"
"#;

        let config = HubConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.market.binance_base_url, "https://binance.test/api/v3");
        assert_eq!(config.market.coingecko_base_url, "${HUB_TEST_UNSET_VAR}");
        assert!(config.validate().is_err());

        std::env::remove_var("HUB_TEST_BINANCE_URL");
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            "[market]\ncoingecko_base_url = \"ftp://example.com\"",
            "[market]\ntimeout_seconds = 0",
            "[portfolio]\ncandle_interval = \"hourly\"",
            "[portfolio]\ncandle_limit = 5000",
            "[portfolio]\nfallback_price = -1.0",
            "[portfolio]\nforecast_base_year = 2147483647",
            "[portfolio]\nforecast_base_year = 1900",
            "[output]\noutput_path = \"\"",
        ];

        for content in invalid {
            let config = HubConfig::from_toml_str(content).unwrap();
            assert!(config.validate().is_err(), "expected invalid: {}", content);
        }
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = HubConfig::from_toml_str("[market\nvs_currency = 1").unwrap_err();
        assert!(matches!(err, HubError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[payments]\nheatmap_seed = 7\n")
            .unwrap();

        let config = HubConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.heatmap_seed(), 7);
    }
}
