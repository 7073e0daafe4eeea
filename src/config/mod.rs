#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::HubConfig;

#[cfg(feature = "cli")]
use crate::utils::error::{HubError, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(feature = "cli")]
impl std::str::FromStr for OutputFormat {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(HubError::UnknownOptionError {
                kind: "output format".to_string(),
                value: other.to_string(),
                expected: "text, json".to_string(),
            }),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cloud-crypto-hub", version)]
#[command(about = "Cloud cost, compliance and crypto portfolio analytics from the command line")]
pub struct CliConfig {
    /// Path to a TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// text or json
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Skip live market data and use demo values
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Estimate the monthly cost of a deployment
    Cost(cli::CostArgs),
    /// Price the same workload under every deployment model
    Compare(cli::CostArgs),
    /// Security and compliance recommendations
    Compliance(cli::ComplianceArgs),
    /// Recommend IaaS, PaaS or SaaS
    AdviseService(cli::ServiceAdviceArgs),
    /// Recommend a deployment model
    AdviseDeployment(cli::DeploymentAdviceArgs),
    /// Who manages what under IaaS, PaaS and SaaS
    Responsibilities,
    /// Deployment and service model overviews
    Models,
    /// Value a crypto portfolio and compute risk metrics
    Portfolio(cli::PortfolioArgs),
    /// Compound-growth price scenarios for one token
    Forecast(cli::ForecastArgs),
    /// Project revenue for a payment business model
    Revenue(cli::RevenueArgs),
    /// Customer conversion funnel
    Funnel(cli::FunnelArgs),
    /// Payment method trends and the transaction heatmap
    Payments(cli::PaymentsArgs),
    /// Write a full dashboard snapshot bundle (zip)
    Export(cli::ExportArgs),
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::domain::model::DeploymentModel;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let config = CliConfig::try_parse_from([
            "cloud-crypto-hub",
            "cost",
            "--model",
            "on-prem",
            "--format",
            "json",
            "--offline",
        ])
        .unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.offline);
        match config.command {
            Command::Cost(args) => {
                assert_eq!(args.model, DeploymentModel::OnPremises);
                assert_eq!(args.ingest_gb, 40);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let result = CliConfig::try_parse_from(["cloud-crypto-hub", "cost", "--model", "mainframe"]);
        assert!(result.is_err());

        let result = CliConfig::try_parse_from(["cloud-crypto-hub", "--format", "yaml", "models"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_portfolio_lists_and_allocations() {
        let config = CliConfig::try_parse_from([
            "cloud-crypto-hub",
            "portfolio",
            "--major",
            "bitcoin,solana",
            "--allocation",
            "bitcoin=70",
            "--allocation",
            "solana=30",
        ])
        .unwrap();

        let Command::Portfolio(args) = config.command else {
            panic!("expected portfolio command");
        };
        let input = args.to_input().unwrap();
        assert_eq!(input.tokens(), vec!["bitcoin", "solana"]);
        assert_eq!(input.allocation_total(), 100);
    }
}
