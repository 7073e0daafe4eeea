use crate::domain::model::{
    Choice, CompanySize, ComplianceFramework, DeploymentModel, Industry, NetworkIsolation,
};
use crate::utils::error::Result;
use crate::utils::validation::{validate_input_range, Validate};
use serde::{Deserialize, Serialize};

pub const INGEST_GB_RANGE: (u32, u32) = (1, 500);
pub const USERS_RANGE: (u32, u32) = (5, 1000);

const DATA_COST_PER_GB: f64 = 2.5;
const COST_PER_USER: f64 = 1.2;
const COST_PER_FRAMEWORK: f64 = 150.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostInputs {
    pub model: DeploymentModel,
    pub company_size: CompanySize,
    pub industry: Industry,
    /// Daily data processed, in GB
    pub ingest_gb: u32,
    /// People using analytics dashboards
    pub users: u32,
    pub network: NetworkIsolation,
    pub compliance: Vec<ComplianceFramework>,
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            model: DeploymentModel::PublicCloud,
            company_size: CompanySize::Sme,
            industry: Industry::FinancialServices,
            ingest_gb: 40,
            users: 60,
            network: NetworkIsolation::Standard,
            compliance: vec![ComplianceFramework::Gdpr],
        }
    }
}

impl Validate for CostInputs {
    fn validate(&self) -> Result<()> {
        validate_input_range("ingest_gb", self.ingest_gb, INGEST_GB_RANGE.0, INGEST_GB_RANGE.1)?;
        validate_input_range("users", self.users, USERS_RANGE.0, USERS_RANGE.1)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub model: DeploymentModel,
    pub base_infrastructure: f64,
    pub data_processing: f64,
    pub user_access: f64,
    pub compliance: f64,
    pub security_multiplier: f64,
    pub industry_multiplier: f64,
    pub size_multiplier: f64,
    pub monthly_total: f64,
}

impl CostBreakdown {
    pub fn subtotal(&self) -> f64 {
        self.base_infrastructure + self.data_processing + self.user_access + self.compliance
    }

    pub fn annual_total(&self) -> f64 {
        self.monthly_total * 12.0
    }
}

pub fn base_cost(model: DeploymentModel) -> f64 {
    match model {
        DeploymentModel::OnPremises => 800.0,
        DeploymentModel::PublicCloud => 200.0,
        DeploymentModel::HybridCloud => 400.0,
    }
}

pub fn security_multiplier(level: NetworkIsolation) -> f64 {
    match level {
        NetworkIsolation::Basic => 1.0,
        NetworkIsolation::Standard => 1.2,
        NetworkIsolation::High => 1.5,
        NetworkIsolation::Maximum => 2.0,
    }
}

pub fn industry_multiplier(industry: Industry) -> f64 {
    match industry {
        Industry::FinancialServices => 1.4,
        Industry::Healthcare => 1.3,
        Industry::Government => 1.5,
        Industry::EcommerceRetail => 1.1,
        Industry::Manufacturing => 1.2,
        Industry::TechnologySaas => 1.0,
    }
}

pub fn size_multiplier(size: CompanySize) -> f64 {
    match size {
        CompanySize::Startup => 0.8,
        CompanySize::Sme => 1.0,
        CompanySize::Enterprise => 1.3,
    }
}

/// 估算每月雲端成本
pub fn estimate_monthly_cost(inputs: &CostInputs) -> Result<CostBreakdown> {
    inputs.validate()?;

    let base_infrastructure = base_cost(inputs.model);
    let data_processing = inputs.ingest_gb as f64 * DATA_COST_PER_GB;
    let user_access = inputs.users as f64 * COST_PER_USER;
    let compliance = inputs.compliance.len() as f64 * COST_PER_FRAMEWORK;

    let security = security_multiplier(inputs.network);
    let industry = industry_multiplier(inputs.industry);
    let size = size_multiplier(inputs.company_size);

    let monthly_total =
        (base_infrastructure + data_processing + user_access + compliance) * security * industry * size;

    tracing::debug!(
        "💰 {} cost: base={} data={} users={} compliance={} x{} x{} x{} = {:.2}",
        inputs.model.key(),
        base_infrastructure,
        data_processing,
        user_access,
        compliance,
        security,
        industry,
        size,
        monthly_total
    );

    Ok(CostBreakdown {
        model: inputs.model,
        base_infrastructure,
        data_processing,
        user_access,
        compliance,
        security_multiplier: security,
        industry_multiplier: industry,
        size_multiplier: size,
        monthly_total,
    })
}

/// Same workload priced under every deployment model, cheapest first.
pub fn compare_deployment_models(inputs: &CostInputs) -> Result<Vec<CostBreakdown>> {
    let mut breakdowns = DeploymentModel::all()
        .iter()
        .map(|model| {
            let scenario = CostInputs {
                model: *model,
                ..inputs.clone()
            };
            estimate_monthly_cost(&scenario)
        })
        .collect::<Result<Vec<_>>>()?;

    breakdowns.sort_by(|a, b| a.monthly_total.total_cmp(&b.monthly_total));
    Ok(breakdowns)
}
