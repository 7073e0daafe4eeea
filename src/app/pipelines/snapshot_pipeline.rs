use crate::config::toml_config::DEFAULT_BUNDLE_NAME;
use crate::core::compliance::{self, ComplianceReport};
use crate::core::cost::{self, CostBreakdown, CostInputs};
use crate::core::payments::{
    self, FunnelModel, FunnelReport, HeatmapPeak, PaymentTrends, TransactionHeatmap,
};
use crate::core::portfolio::{
    MarketSnapshot, PortfolioAnalyzer, PortfolioInput, PortfolioReport, PortfolioSettings,
};
use crate::core::revenue::{self, RevenueInputs, RevenueProjection};
use crate::domain::model::DataSensitivity;
use crate::domain::ports::{ConfigProvider, MarketData, Pipeline, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Inputs for every panel of one snapshot.
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub portfolio: PortfolioInput,
    /// Deployment, industry and frameworks here also drive the compliance panel
    pub cost: CostInputs,
    pub sensitivity: DataSensitivity,
    pub revenue: RevenueInputs,
    pub funnel: FunnelModel,
    pub heatmap_base_rate: f64,
}

impl DashboardRequest {
    pub fn new(portfolio: PortfolioInput) -> Self {
        Self {
            portfolio,
            cost: CostInputs::default(),
            sensitivity: DataSensitivity::Confidential,
            revenue: RevenueInputs::default(),
            funnel: FunnelModel::default(),
            heatmap_base_rate: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub portfolio: PortfolioReport,
    pub cost: CostBreakdown,
    pub cost_comparison: Vec<CostBreakdown>,
    pub compliance: ComplianceReport,
    pub revenue: RevenueProjection,
    pub payment_trends: PaymentTrends,
    pub funnel: FunnelReport,
    pub heatmap: TransactionHeatmap,
    pub heatmap_peak: Option<HeatmapPeak>,
}

pub struct SnapshotPipeline<S: Storage, C: ConfigProvider, M: MarketData> {
    storage: S,
    config: C,
    analyzer: PortfolioAnalyzer<M>,
    request: DashboardRequest,
    bundle_name: String,
}

impl<S: Storage, C: ConfigProvider, M: MarketData> SnapshotPipeline<S, C, M> {
    /// Portfolio settings come from `config`; forecast settings use defaults
    /// until overridden with [`SnapshotPipeline::with_settings`].
    pub fn new(storage: S, config: C, market: M, request: DashboardRequest) -> Self {
        let settings = PortfolioSettings {
            vs_currency: config.vs_currency().to_string(),
            candle_interval: config.candle_interval().to_string(),
            candle_limit: config.candle_limit(),
            ..PortfolioSettings::default()
        };
        Self {
            storage,
            config,
            analyzer: PortfolioAnalyzer::new(market, settings),
            request,
            bundle_name: DEFAULT_BUNDLE_NAME.to_string(),
        }
    }

    pub fn with_settings(mut self, settings: PortfolioSettings) -> Self {
        self.analyzer.set_settings(settings);
        self
    }

    pub fn with_bundle_name(mut self, bundle_name: impl Into<String>) -> Self {
        self.bundle_name = bundle_name.into();
        self
    }

    pub fn request(&self) -> &DashboardRequest {
        &self.request
    }
}

/// Header row first, then one serialized row per item. The header is written
/// even when there are no rows.
fn to_csv<T: Serialize>(header: &[&str], rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let data = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(data)
}

#[async_trait]
impl<S: Storage, C: ConfigProvider, M: MarketData> Pipeline for SnapshotPipeline<S, C, M> {
    type Snapshot = MarketSnapshot;
    type Report = DashboardReport;

    async fn extract(&self) -> Result<MarketSnapshot> {
        let snapshot = self.analyzer.fetch_snapshot(&self.request.portfolio).await;
        tracing::info!(
            "📊 Market snapshot: {} prices, {} candle series",
            snapshot.prices.as_ref().map_or(0, |p| p.len()),
            snapshot.candles.len()
        );
        Ok(snapshot)
    }

    async fn transform(&self, snapshot: MarketSnapshot) -> Result<DashboardReport> {
        let request = &self.request;

        let portfolio = self.analyzer.build_report(&request.portfolio, &snapshot)?;
        let cost = cost::estimate_monthly_cost(&request.cost)?;
        let cost_comparison = cost::compare_deployment_models(&request.cost)?;
        let compliance = compliance::recommend(
            request.cost.model,
            request.sensitivity,
            &request.cost.compliance,
            request.cost.industry,
        );
        let revenue = revenue::project_revenue(&request.revenue)?;
        let heatmap = TransactionHeatmap::generate(self.config.heatmap_seed(), request.heatmap_base_rate);

        for warning in &portfolio.warnings {
            tracing::warn!("⚠️ {}", warning);
        }
        tracing::debug!(
            "Report: portfolio={:.2} cost={:.2} revenue={:.2}",
            portfolio.valuation.total_value,
            cost.monthly_total,
            revenue.monthly_revenue
        );

        Ok(DashboardReport {
            generated_at: snapshot.fetched_at,
            portfolio,
            cost,
            cost_comparison,
            compliance,
            revenue,
            payment_trends: payments::payment_method_trends(),
            funnel: payments::conversion_funnel(&request.funnel),
            heatmap_peak: heatmap.peak(),
            heatmap,
        })
    }

    async fn load(&self, report: DashboardReport) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), self.bundle_name);
        tracing::debug!("Preparing bundle: {}", output_path);

        let holdings = to_csv(
            &["token", "label", "percent", "spot_price", "value_usd", "units"],
            &report.portfolio.valuation.holdings,
        )?;
        let forecast = to_csv(
            &["year", "conservative", "optimistic", "pessimistic"],
            report.portfolio.forecast.iter().flat_map(|f| f.points.iter()),
        )?;
        let candles = to_csv(
            &["open_time", "open", "high", "low", "close", "volume"],
            &report.portfolio.primary_candles,
        )?;
        let heatmap = to_csv(
            &["day", "hour", "volume"],
            report.heatmap.days.iter().zip(&report.heatmap.volumes).flat_map(|(day, row)| {
                row.iter().enumerate().map(move |(hour, volume)| (*day, hour, *volume))
            }),
        )?;
        let json = serde_json::to_string_pretty(&report)?;

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            let entries: [(&str, &[u8]); 5] = [
                ("report.json", json.as_bytes()),
                ("holdings.csv", &holdings),
                ("forecast.csv", &forecast),
                ("candles.csv", &candles),
                ("heatmap.csv", &heatmap),
            ];
            for (name, data) in entries {
                zip.start_file(name, options)?;
                zip.write_all(data)?;
            }

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&self.bundle_name, &zip_data).await?;

        Ok(output_path)
    }
}
