use crate::app::pipelines::snapshot_pipeline::DashboardRequest;
use crate::core::advisor::{Priority, PrimaryConcern, TeamExpertise, TeamProfile, WorkloadPattern};
use crate::core::cost::CostInputs;
use crate::core::payments::FunnelModel;
use crate::core::portfolio::{parse_allocation, PortfolioInput, PortfolioSelection};
use crate::core::revenue::{RevenueInputs, RevenueModel};
use crate::domain::model::{
    choice_traits, Choice, CompanySize, ComplianceFramework, DataSensitivity, DeploymentModel, Industry,
    NetworkIsolation,
};
use crate::utils::error::Result;
use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct CostArgs {
    /// on-premises, public-cloud or hybrid-cloud
    #[arg(long, default_value = "public-cloud")]
    pub model: DeploymentModel,

    /// startup, sme or enterprise
    #[arg(long, default_value = "sme")]
    pub size: CompanySize,

    #[arg(long, default_value = "financial-services")]
    pub industry: Industry,

    /// Daily data processed in GB (1-500)
    #[arg(long, default_value_t = 40)]
    pub ingest_gb: u32,

    /// Dashboard users (5-1000)
    #[arg(long, default_value_t = 60)]
    pub users: u32,

    /// basic, standard, high or maximum
    #[arg(long, default_value = "standard")]
    pub network: NetworkIsolation,

    /// Comma separated frameworks, e.g. gdpr,pci-dss, or none
    #[arg(long, default_value = "gdpr")]
    pub compliance: String,
}

impl CostArgs {
    pub fn to_inputs(&self) -> Result<CostInputs> {
        Ok(CostInputs {
            model: self.model,
            company_size: self.size,
            industry: self.industry,
            ingest_gb: self.ingest_gb,
            users: self.users,
            network: self.network,
            compliance: ComplianceFramework::parse_list(&self.compliance)?,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct ComplianceArgs {
    #[arg(long, default_value = "public-cloud")]
    pub model: DeploymentModel,

    /// public, internal, confidential or restricted
    #[arg(long, default_value = "confidential")]
    pub sensitivity: DataSensitivity,

    #[arg(long, default_value = "gdpr")]
    pub compliance: String,

    #[arg(long, default_value = "financial-services")]
    pub industry: Industry,
}

impl ComplianceArgs {
    pub fn frameworks(&self) -> Result<Vec<ComplianceFramework>> {
        ComplianceFramework::parse_list(&self.compliance)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServiceAdviceArgs {
    /// control, speed, overhead or cost
    #[arg(long, default_value = "control")]
    pub priority: Priority,

    /// infrastructure, developers, business or mixed
    #[arg(long, default_value = "mixed")]
    pub expertise: TeamExpertise,
}

#[derive(Debug, Clone, Args)]
pub struct DeploymentAdviceArgs {
    /// security, initial-cost, time-to-market or flexibility
    #[arg(long, default_value = "security")]
    pub concern: PrimaryConcern,

    #[arg(long, default_value = "predictable")]
    pub workload: WorkloadPattern,

    #[arg(long, default_value = "small")]
    pub team: TeamProfile,
}

#[derive(Debug, Clone, Args)]
pub struct PortfolioArgs {
    /// Major tokens (CoinGecko ids), comma separated
    #[arg(long, value_delimiter = ',')]
    pub major: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub stable: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub defi: Vec<String>,

    /// Override a token's share, e.g. --allocation bitcoin=60 (repeatable)
    #[arg(long = "allocation", value_name = "TOKEN=PERCENT")]
    pub allocations: Vec<String>,

    /// Portfolio size in USD (100 - 1,000,000)
    #[arg(long, default_value_t = 10_000.0)]
    pub portfolio_size: f64,
}

impl PortfolioArgs {
    pub fn to_input(&self) -> Result<PortfolioInput> {
        let selection = PortfolioSelection {
            major: self.major.clone(),
            stable: self.stable.clone(),
            defi: self.defi.clone(),
        };
        let overrides = self
            .allocations
            .iter()
            .map(|a| parse_allocation(a))
            .collect::<Result<Vec<_>>>()?;
        PortfolioInput::from_selection(&selection, &overrides, self.portfolio_size)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ForecastArgs {
    #[arg(long, default_value = "bitcoin")]
    pub token: String,

    /// Starting price; fetched live when omitted
    #[arg(long)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueKind {
    TransactionFees,
    Subscription,
    Freemium,
}

impl Choice for RevenueKind {
    const KIND: &'static str = "revenue model";

    fn all() -> &'static [Self] {
        &[Self::TransactionFees, Self::Subscription, Self::Freemium]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::TransactionFees => "transaction-fees",
            Self::Subscription => "subscription",
            Self::Freemium => "freemium",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::TransactionFees => "Transaction Fees",
            Self::Subscription => "Subscription + Fees",
            Self::Freemium => "Freemium Model",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::TransactionFees => &["fees"],
            _ => &[],
        }
    }
}

choice_traits!(RevenueKind);

#[derive(Debug, Clone, Args)]
pub struct RevenueArgs {
    /// transaction-fees, subscription or freemium
    #[arg(long, default_value = "transaction-fees")]
    pub model: RevenueKind,

    #[arg(long, default_value_t = 100_000)]
    pub users: u64,

    #[arg(long, default_value_t = 75.0)]
    pub avg_transaction: f64,

    #[arg(long, default_value_t = 8)]
    pub transactions_per_user: u32,

    /// Percent of volume (transaction-fees)
    #[arg(long)]
    pub fee_rate: Option<f64>,

    /// USD per transaction (transaction-fees)
    #[arg(long)]
    pub fixed_fee: Option<f64>,

    /// USD per user per month (subscription)
    #[arg(long)]
    pub monthly_fee: Option<f64>,

    /// Percent of volume (subscription)
    #[arg(long)]
    pub reduced_fee_rate: Option<f64>,

    /// Percent of users upgrading (freemium)
    #[arg(long)]
    pub conversion_rate: Option<f64>,

    /// USD per premium user per month (freemium)
    #[arg(long)]
    pub premium_price: Option<f64>,
}

impl RevenueArgs {
    pub fn to_inputs(&self) -> RevenueInputs {
        // 未指定的參數沿用各模式的預設值
        let model = match self.model {
            RevenueKind::TransactionFees => RevenueModel::TransactionFees {
                fee_rate_pct: self.fee_rate.unwrap_or(2.9),
                fixed_fee: self.fixed_fee.unwrap_or(0.30),
            },
            RevenueKind::Subscription => RevenueModel::Subscription {
                monthly_fee: self.monthly_fee.unwrap_or(20.0),
                reduced_fee_rate_pct: self.reduced_fee_rate.unwrap_or(1.9),
            },
            RevenueKind::Freemium => RevenueModel::Freemium {
                conversion_rate_pct: self.conversion_rate.unwrap_or(5.0),
                premium_price: self.premium_price.unwrap_or(50.0),
            },
        };

        RevenueInputs {
            monthly_users: self.users,
            avg_transaction: self.avg_transaction,
            transactions_per_user: self.transactions_per_user,
            model,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FunnelArgs {
    #[arg(long, default_value_t = 100_000)]
    pub visitors: u64,

    /// Stage conversion rates in percent
    #[arg(long, default_value_t = 15.0)]
    pub signup_rate: f64,

    #[arg(long, default_value_t = 75.0)]
    pub kyc_rate: f64,

    #[arg(long, default_value_t = 60.0)]
    pub first_payment_rate: f64,

    #[arg(long, default_value_t = 70.0)]
    pub active_rate: f64,

    #[arg(long, default_value_t = 30.0)]
    pub power_user_rate: f64,
}

impl FunnelArgs {
    pub fn to_model(&self) -> Result<FunnelModel> {
        use crate::utils::validation::validate_input_range;

        let rates = [
            ("signup_rate", self.signup_rate),
            ("kyc_rate", self.kyc_rate),
            ("first_payment_rate", self.first_payment_rate),
            ("active_rate", self.active_rate),
            ("power_user_rate", self.power_user_rate),
        ];
        for (field, rate) in rates {
            validate_input_range(field, rate, 0.0, 100.0)?;
        }

        Ok(FunnelModel {
            visitors: self.visitors,
            signup_rate: self.signup_rate / 100.0,
            kyc_rate: self.kyc_rate / 100.0,
            first_payment_rate: self.first_payment_rate / 100.0,
            active_rate: self.active_rate / 100.0,
            power_user_rate: self.power_user_rate / 100.0,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct PaymentsArgs {
    /// Heatmap RNG seed; defaults to the configured seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mean transactions per hour before time-of-day factors
    #[arg(long)]
    pub base_rate: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    #[command(flatten)]
    pub cost: CostArgs,

    #[arg(long, default_value = "confidential")]
    pub sensitivity: DataSensitivity,

    /// Output directory; overrides the configured output path
    #[arg(long)]
    pub output: Option<String>,
}

impl ExportArgs {
    pub fn to_request(&self, heatmap_base_rate: f64) -> Result<DashboardRequest> {
        let mut request = DashboardRequest::new(self.portfolio.to_input()?);
        request.cost = self.cost.to_inputs()?;
        request.sensitivity = self.sensitivity;
        request.heatmap_base_rate = heatmap_base_rate;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_overrides_apply_to_selected_model() {
        let args = RevenueArgs {
            model: "subscription".parse().unwrap(),
            users: 5_000,
            avg_transaction: 40.0,
            transactions_per_user: 3,
            fee_rate: Some(4.0),
            fixed_fee: None,
            monthly_fee: Some(12.0),
            reduced_fee_rate: None,
            conversion_rate: None,
            premium_price: None,
        };

        let inputs = args.to_inputs();
        assert_eq!(inputs.monthly_users, 5_000);
        assert_eq!(
            inputs.model,
            RevenueModel::Subscription {
                monthly_fee: 12.0,
                reduced_fee_rate_pct: 1.9,
            }
        );
    }

    #[test]
    fn test_revenue_kind_parsing() {
        assert_eq!("fees".parse::<RevenueKind>().unwrap(), RevenueKind::TransactionFees);
        assert_eq!("Freemium Model".parse::<RevenueKind>().unwrap(), RevenueKind::Freemium);
        assert!("ads".parse::<RevenueKind>().is_err());
    }

    #[test]
    fn test_funnel_rates_are_percentages() {
        let args = FunnelArgs {
            visitors: 1_000,
            signup_rate: 20.0,
            kyc_rate: 50.0,
            first_payment_rate: 50.0,
            active_rate: 50.0,
            power_user_rate: 10.0,
        };
        let model = args.to_model().unwrap();
        assert_eq!(model.signup_rate, 0.2);

        let invalid = FunnelArgs {
            kyc_rate: 120.0,
            ..args
        };
        assert!(invalid.to_model().is_err());
    }

    #[test]
    fn test_cost_args_parse_frameworks() {
        let args = CostArgs {
            model: DeploymentModel::HybridCloud,
            size: CompanySize::Startup,
            industry: Industry::Healthcare,
            ingest_gb: 10,
            users: 20,
            network: NetworkIsolation::High,
            compliance: "hipaa, gdpr".to_string(),
        };
        let inputs = args.to_inputs().unwrap();
        assert_eq!(inputs.compliance, vec![ComplianceFramework::Hipaa, ComplianceFramework::Gdpr]);

        let bad = CostArgs {
            compliance: "fedramp".to_string(),
            ..args
        };
        assert!(bad.to_inputs().is_err());
    }
}
