use cloud_crypto_hub::core::compliance::{self, DeploymentFit};
use cloud_crypto_hub::core::cost::{compare_deployment_models, estimate_monthly_cost, CostInputs};
use cloud_crypto_hub::core::revenue::{project_revenue, RevenueInputs, RevenueModel};
use cloud_crypto_hub::domain::model::{
    CompanySize, ComplianceFramework, DataSensitivity, DeploymentModel, Industry, NetworkIsolation,
};
use cloud_crypto_hub::HubError;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_cost_from_cli_style_keys() -> anyhow::Result<()> {
    let inputs = CostInputs {
        model: "public".parse::<DeploymentModel>()?,
        company_size: "startup".parse::<CompanySize>()?,
        industry: "saas".parse::<Industry>()?,
        ingest_gb: 10,
        users: 5,
        network: "basic".parse::<NetworkIsolation>()?,
        compliance: vec![],
    };
    let breakdown = estimate_monthly_cost(&inputs)?;
    assert!(approx(breakdown.monthly_total, 184.8));

    let heavy = CostInputs {
        model: DeploymentModel::OnPremises,
        company_size: CompanySize::Enterprise,
        industry: Industry::Government,
        ingest_gb: 500,
        users: 1000,
        network: NetworkIsolation::Maximum,
        compliance: vec![ComplianceFramework::Gdpr, ComplianceFramework::Sox, "pci".parse()?],
    };
    let breakdown = estimate_monthly_cost(&heavy)?;
    assert!(approx(breakdown.monthly_total, 14_430.0));

    // 相同工作負載下公有雲永遠最便宜
    let ranked = compare_deployment_models(&heavy)?;
    assert_eq!(ranked[0].model, DeploymentModel::PublicCloud);
    assert_eq!(ranked[2].model, DeploymentModel::OnPremises);
    Ok(())
}

#[test]
fn test_unknown_option_lists_expected_keys() {
    let err = "mainframe".parse::<DeploymentModel>().unwrap_err();
    match err {
        HubError::UnknownOptionError { value, expected, .. } => {
            assert_eq!(value, "mainframe");
            assert_eq!(expected, "on-premises, public-cloud, hybrid-cloud");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_restricted_data_steers_away_from_public_cloud() {
    let frameworks = [ComplianceFramework::Hipaa];
    let public = compliance::recommend(
        DeploymentModel::PublicCloud,
        DataSensitivity::Restricted,
        &frameworks,
        Industry::Healthcare,
    );
    let hybrid = compliance::recommend(
        DeploymentModel::HybridCloud,
        DataSensitivity::Restricted,
        &frameworks,
        Industry::Healthcare,
    );

    assert_eq!(public.deployment_fit, DeploymentFit::HighRisk);
    assert_eq!(hybrid.deployment_fit, DeploymentFit::GoodFit);
    assert_eq!(public.framework_details.len(), 1);
}

#[test]
fn test_subscription_beats_fees_at_default_volume() -> anyhow::Result<()> {
    let mut best: Option<(&'static str, f64)> = None;
    for model in [
        RevenueModel::default_transaction_fees(),
        RevenueModel::default_subscription(),
        RevenueModel::default_freemium(),
    ] {
        let projection = project_revenue(&RevenueInputs {
            model,
            ..RevenueInputs::default()
        })?;
        if best.map_or(true, |(_, revenue)| projection.monthly_revenue > revenue) {
            best = Some((projection.model_name, projection.monthly_revenue));
        }
    }

    let (name, revenue) = best.unwrap();
    assert_eq!(name, "Subscription + Fees");
    assert!(approx(revenue, 3_140_000.0));
    Ok(())
}
