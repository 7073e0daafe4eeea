use clap::Parser;
use cloud_crypto_hub::app::{market_from_config, render};
use cloud_crypto_hub::core::advisor::{
    recommend_deployment, recommend_service_model, responsibility_matrix, ModelOverview, ServiceProfile,
};
use cloud_crypto_hub::core::payments::{
    conversion_funnel, payment_method_trends, HeatmapPeak, PaymentTrends, TransactionHeatmap,
};
use cloud_crypto_hub::core::portfolio::PortfolioAnalyzer;
use cloud_crypto_hub::core::{compliance, cost, revenue};
use cloud_crypto_hub::domain::model::{Choice, ServiceModel};
use cloud_crypto_hub::domain::ports::ConfigProvider;
use cloud_crypto_hub::utils::error::ErrorSeverity;
use cloud_crypto_hub::utils::logger;
use cloud_crypto_hub::utils::validation::{validate_input_range, Validate};
use cloud_crypto_hub::{
    CliConfig, Command, HubConfig, HubEngine, LocalStorage, OutputFormat, Result, SnapshotPipeline,
};
use serde::Serialize;

#[derive(Serialize)]
struct ModelsView {
    deployment: Vec<ModelOverview>,
    service: Vec<ServiceProfile>,
}

#[derive(Serialize)]
struct PaymentsView {
    trends: PaymentTrends,
    heatmap: TransactionHeatmap,
    peak: Option<HeatmapPeak>,
}

#[derive(Serialize)]
struct ExportView {
    output_path: String,
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce(&T) -> String) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        OutputFormat::Text => Ok(text(value)),
    }
}

async fn run(cli: &CliConfig, config: &HubConfig) -> Result<String> {
    let format = cli.format;

    match &cli.command {
        Command::Cost(args) => {
            let breakdown = cost::estimate_monthly_cost(&args.to_inputs()?)?;
            emit(format, &breakdown, render::cost)
        }
        Command::Compare(args) => {
            let breakdowns = cost::compare_deployment_models(&args.to_inputs()?)?;
            emit(format, &breakdowns, |b| render::comparison(b))
        }
        Command::Compliance(args) => {
            let report = compliance::recommend(args.model, args.sensitivity, &args.frameworks()?, args.industry);
            emit(format, &report, render::compliance)
        }
        Command::AdviseService(args) => {
            let rec = recommend_service_model(args.priority, args.expertise);
            emit(format, &rec, |r| render::recommendation("Recommended service model", r))
        }
        Command::AdviseDeployment(args) => {
            let rec = recommend_deployment(args.concern, args.workload, args.team);
            emit(format, &rec, |r| render::recommendation("Recommended deployment model", r))
        }
        Command::Responsibilities => {
            let rows = responsibility_matrix();
            emit(format, &rows, |r| render::responsibilities(r))
        }
        Command::Models => {
            let view = ModelsView {
                deployment: render::all_model_overviews(),
                service: ServiceModel::all().iter().map(ServiceModel::profile).collect(),
            };
            emit(format, &view, |v| {
                format!("{}\n{}", render::model_overviews(&v.deployment), render::service_profiles())
            })
        }
        Command::Portfolio(args) => {
            let input = args.to_input()?;
            let analyzer = PortfolioAnalyzer::new(market_from_config(config)?, config.portfolio_settings());
            let report = analyzer.analyze(&input).await?;
            emit(format, &report, render::portfolio)
        }
        Command::Forecast(args) => {
            let analyzer = PortfolioAnalyzer::new(market_from_config(config)?, config.portfolio_settings());
            let token = args.token.trim().to_lowercase();
            let forecast = analyzer.forecast(&token, args.price).await?;
            emit(format, &forecast, render::forecast)
        }
        Command::Revenue(args) => {
            let projection = revenue::project_revenue(&args.to_inputs())?;
            emit(format, &projection, render::revenue)
        }
        Command::Funnel(args) => {
            let report = conversion_funnel(&args.to_model()?);
            emit(format, &report, render::funnel)
        }
        Command::Payments(args) => {
            let seed = args.seed.unwrap_or_else(|| config.heatmap_seed());
            let base_rate = args.base_rate.unwrap_or_else(|| config.heatmap_base_rate());
            validate_input_range("base_rate", base_rate, 1.0, 10_000.0)?;
            let heatmap = TransactionHeatmap::generate(seed, base_rate);
            let view = PaymentsView {
                trends: payment_method_trends(),
                peak: heatmap.peak(),
                heatmap,
            };
            emit(format, &view, |v| render::payments(&v.trends, &v.heatmap))
        }
        Command::Export(args) => {
            let mut config = config.clone();
            if let Some(output) = &args.output {
                config.output.output_path = output.clone();
                config.validate()?;
            }

            let request = args.to_request(config.heatmap_base_rate())?;
            let storage = LocalStorage::new(config.output_path());
            let pipeline = SnapshotPipeline::new(storage, config.clone(), market_from_config(&config)?, request)
                .with_settings(config.portfolio_settings())
                .with_bundle_name(config.bundle_name());

            let engine = HubEngine::new(pipeline);
            let output_path = engine.run().await?;
            emit(format, &ExportView { output_path }, |v| {
                format!("✅ Snapshot exported successfully!\n📁 Output saved to: {}\n", v.output_path)
            })
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入設定檔，未指定時使用預設值
    let mut config = match &cli.config {
        Some(path) => match HubConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => HubConfig::default(),
    };
    if cli.offline {
        config.market.offline = true;
    }

    // 初始化日誌
    let verbose = cli.verbose || config.monitoring.verbose;
    if cli.log_json || config.monitoring.json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting cloud-crypto-hub");
    tracing::debug!("CLI args: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&cli, &config).await {
        Ok(output) => print!("{}", output),
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,      // 警告，但成功
                ErrorSeverity::Medium => 2,   // 可重試
                ErrorSeverity::High => 1,     // 輸入或處理錯誤
                ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
