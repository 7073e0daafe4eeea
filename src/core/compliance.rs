//! Compliance, security and risk recommendations for a deployment scenario.

use crate::domain::model::{ComplianceFramework, DataSensitivity, DeploymentModel, Industry};
use serde::Serialize;

/// Baseline security controls for a data sensitivity level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRequirements {
    pub encryption: &'static str,
    pub access_controls: &'static str,
    pub data_residency: &'static str,
    pub audit_logging: &'static str,
    pub backup_retention: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryContext {
    pub key_risks: &'static [&'static str],
    pub recommended_models: &'static [DeploymentModel],
    pub rationale: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentImpact {
    pub model: DeploymentModel,
    /// `false` means the model needs extra care for this framework
    pub favorable: bool,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkDetails {
    pub framework: ComplianceFramework,
    pub key_requirements: &'static [&'static str],
    pub technical_controls: &'static [&'static str],
    pub deployment_impact: Vec<DeploymentImpact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentFit {
    Suitable,
    Acceptable,
    GoodFit,
    ModerateRisk,
    HighRisk,
}

impl DeploymentFit {
    pub fn message(&self) -> &'static str {
        match self {
            DeploymentFit::Suitable => "SUITABLE: Standard cloud security practices sufficient",
            DeploymentFit::Acceptable => "ACCEPTABLE: With proper encryption and access controls",
            DeploymentFit::GoodFit => "GOOD FIT: Recommended for restricted data",
            DeploymentFit::ModerateRisk => {
                "MODERATE RISK: Requires careful cloud provider selection and configuration"
            }
            DeploymentFit::HighRisk => {
                "HIGH RISK: Restricted data typically requires on-premises or certified private cloud"
            }
        }
    }

    pub fn is_risky(&self) -> bool {
        matches!(self, DeploymentFit::ModerateRisk | DeploymentFit::HighRisk)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplementationPlan {
    pub priorities: &'static [&'static str],
    pub complexity: &'static str,
    pub timeline: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    pub model: DeploymentModel,
    pub sensitivity: DataSensitivity,
    pub industry: Industry,
    pub data_requirements: DataRequirements,
    pub industry_context: IndustryContext,
    pub framework_details: Vec<FrameworkDetails>,
    pub deployment_fit: DeploymentFit,
    pub implementation: ImplementationPlan,
    pub risk: RiskAssessment,
}

pub fn data_requirements(sensitivity: DataSensitivity) -> DataRequirements {
    match sensitivity {
        DataSensitivity::Public => DataRequirements {
            encryption: "Standard TLS in transit",
            access_controls: "Basic IAM roles",
            data_residency: "Any region acceptable",
            audit_logging: "Basic access logs",
            backup_retention: "30 days",
        },
        DataSensitivity::Internal => DataRequirements {
            encryption: "TLS 1.3 + encryption at rest",
            access_controls: "Role-based access (RBAC)",
            data_residency: "Preferred region/country",
            audit_logging: "Detailed access + change logs",
            backup_retention: "90 days",
        },
        DataSensitivity::Confidential => DataRequirements {
            encryption: "AES-256 + field-level encryption for PII",
            access_controls: "Strict RBAC + MFA required",
            data_residency: "Must stay in specific region",
            audit_logging: "Full audit trail + real-time alerts",
            backup_retention: "7 years (legal requirement)",
        },
        DataSensitivity::Restricted => DataRequirements {
            encryption: "FIPS 140-2 Level 3 + HSM key management",
            access_controls: "Zero-trust + privileged access mgmt",
            data_residency: "On-premises or certified cloud only",
            audit_logging: "Immutable audit logs + compliance reports",
            backup_retention: "10+ years (regulatory requirement)",
        },
    }
}

pub fn industry_context(industry: Industry) -> IndustryContext {
    use DeploymentModel::*;
    match industry {
        Industry::FinancialServices => IndustryContext {
            key_risks: &["Regulatory fines", "Data breaches", "System downtime"],
            recommended_models: &[OnPremises, HybridCloud],
            rationale: "Core systems often must remain private for regulatory compliance",
        },
        Industry::Healthcare => IndustryContext {
            key_risks: &["HIPAA violations", "Patient safety", "Data breaches"],
            recommended_models: &[OnPremises, HybridCloud],
            rationale: "Patient data requires strict controls and audit trails",
        },
        Industry::Government => IndustryContext {
            key_risks: &["Security breaches", "Data sovereignty", "Public trust"],
            recommended_models: &[OnPremises],
            rationale: "Government data often requires air-gapped or classified environments",
        },
        Industry::EcommerceRetail => IndustryContext {
            key_risks: &["PCI compliance", "Customer data", "Seasonal scaling"],
            recommended_models: &[PublicCloud, HybridCloud],
            rationale: "Need to scale for traffic spikes while protecting payment data",
        },
        Industry::Manufacturing => IndustryContext {
            key_risks: &["Operational downtime", "IP theft", "Supply chain"],
            recommended_models: &[HybridCloud],
            rationale: "Factory floor stays local, analytics and planning in cloud",
        },
        Industry::TechnologySaas => IndustryContext {
            key_risks: &["Service availability", "Customer data", "Competitive advantage"],
            recommended_models: &[PublicCloud],
            rationale: "Need global scale, high availability, and rapid feature deployment",
        },
    }
}

fn impact(model: DeploymentModel, favorable: bool, note: &'static str) -> DeploymentImpact {
    DeploymentImpact {
        model,
        favorable,
        note,
    }
}

pub fn framework_details(framework: ComplianceFramework) -> FrameworkDetails {
    use DeploymentModel::*;
    let (key_requirements, technical_controls, deployment_impact): (
        &'static [&'static str],
        &'static [&'static str],
        Vec<DeploymentImpact>,
    ) = match framework {
        ComplianceFramework::Gdpr => (
            &["Right to be forgotten", "Data portability", "Privacy by design", "DPO appointment"],
            &["Pseudonymization", "Encryption", "Access controls", "Breach notification (72hrs)"],
            vec![
                impact(OnPremises, true, "Full control over data location and processing"),
                impact(PublicCloud, false, "Need EU-based cloud regions + data processing agreements"),
                impact(HybridCloud, false, "Ensure EU data stays in compliant locations"),
            ],
        ),
        ComplianceFramework::Hipaa => (
            &["PHI protection", "Business Associate Agreements", "Risk assessments", "Employee training"],
            &["End-to-end encryption", "Access controls", "Audit logs", "Secure transmission"],
            vec![
                impact(OnPremises, true, "Maximum control, easier compliance audits"),
                impact(PublicCloud, false, "Requires HIPAA-compliant cloud services + BAAs"),
                impact(HybridCloud, false, "PHI must stay in HIPAA-compliant environments"),
            ],
        ),
        ComplianceFramework::Sox => (
            &["Financial data integrity", "Change controls", "Segregation of duties", "Audit trails"],
            &["Immutable logs", "Change approval workflows", "Access reviews", "Data integrity checks"],
            vec![
                impact(OnPremises, true, "Direct control over financial systems"),
                impact(PublicCloud, true, "Can use SOC 2 Type II certified services"),
                impact(HybridCloud, false, "Ensure consistent controls across environments"),
            ],
        ),
        ComplianceFramework::PciDss => (
            &["Cardholder data protection", "Network segmentation", "Regular testing", "Access monitoring"],
            &["Network segmentation", "WAF", "Encryption", "Vulnerability scanning"],
            vec![
                impact(OnPremises, true, "Full control but expensive PCI compliance"),
                impact(PublicCloud, true, "Use PCI-DSS certified cloud services"),
                impact(HybridCloud, false, "Payment processing should be in certified environment"),
            ],
        ),
        ComplianceFramework::Iso27001 => (
            &[
                "Information security management",
                "Risk assessment",
                "Security controls",
                "Continuous improvement",
            ],
            &["Security policies", "Access controls", "Incident response", "Security monitoring"],
            vec![
                impact(OnPremises, true, "Full control over security implementation"),
                impact(PublicCloud, true, "Leverage cloud provider's ISO 27001 certification"),
                impact(HybridCloud, false, "Need consistent security framework across both"),
            ],
        ),
    };

    FrameworkDetails {
        framework,
        key_requirements,
        technical_controls,
        deployment_impact,
    }
}

pub fn deployment_fit(
    model: DeploymentModel,
    sensitivity: DataSensitivity,
    frameworks: &[ComplianceFramework],
) -> DeploymentFit {
    match sensitivity {
        DataSensitivity::Restricted if model == DeploymentModel::PublicCloud => DeploymentFit::HighRisk,
        DataSensitivity::Restricted => DeploymentFit::GoodFit,
        DataSensitivity::Confidential
            if frameworks
                .iter()
                .any(|f| matches!(f, ComplianceFramework::Hipaa | ComplianceFramework::PciDss)) =>
        {
            DeploymentFit::ModerateRisk
        }
        DataSensitivity::Confidential => DeploymentFit::Acceptable,
        DataSensitivity::Public | DataSensitivity::Internal => DeploymentFit::Suitable,
    }
}

const SENSITIVE_PRIORITIES: &[&str] = &[
    "Data classification and mapping",
    "Encryption key management",
    "Identity and access management",
    "Audit logging and monitoring",
    "Backup and disaster recovery",
];

const STANDARD_PRIORITIES: &[&str] = &[
    "Basic access controls",
    "Data encryption in transit/rest",
    "Regular backups",
    "Monitoring and alerting",
    "Documentation and training",
];

pub fn implementation_plan(sensitivity: DataSensitivity) -> ImplementationPlan {
    match sensitivity {
        DataSensitivity::Restricted | DataSensitivity::Confidential => ImplementationPlan {
            priorities: SENSITIVE_PRIORITIES,
            complexity: "HIGH - Requires specialized security expertise",
            timeline: "6-12 months for full implementation",
        },
        DataSensitivity::Public | DataSensitivity::Internal => ImplementationPlan {
            priorities: STANDARD_PRIORITIES,
            complexity: "MEDIUM - Standard security practices",
            timeline: "2-4 months for full implementation",
        },
    }
}

pub fn assess_risk(sensitivity: DataSensitivity, frameworks: &[ComplianceFramework]) -> RiskAssessment {
    match sensitivity {
        DataSensitivity::Restricted => RiskAssessment {
            level: RiskLevel::Critical,
            description: "Highest security measures required. Consider on-premises or specialized compliance cloud.",
        },
        DataSensitivity::Confidential
            if frameworks.iter().any(|f| {
                matches!(
                    f,
                    ComplianceFramework::Hipaa | ComplianceFramework::PciDss | ComplianceFramework::Sox
                )
            }) =>
        {
            RiskAssessment {
                level: RiskLevel::High,
                description: "Significant compliance requirements. Requires specialized cloud configuration.",
            }
        }
        DataSensitivity::Confidential => RiskAssessment {
            level: RiskLevel::Medium,
            description: "Standard enterprise security practices sufficient.",
        },
        DataSensitivity::Internal => RiskAssessment {
            level: RiskLevel::Medium,
            description: "Business-standard security controls needed.",
        },
        DataSensitivity::Public => RiskAssessment {
            level: RiskLevel::Low,
            description: "Basic security measures sufficient.",
        },
    }
}

/// 根據部署模式、資料敏感度、合規要求與產業產生建議
pub fn recommend(
    model: DeploymentModel,
    sensitivity: DataSensitivity,
    frameworks: &[ComplianceFramework],
    industry: Industry,
) -> ComplianceReport {
    let fit = deployment_fit(model, sensitivity, frameworks);
    if fit.is_risky() {
        tracing::warn!("⚠️ {}: {}", model, fit.message());
    }

    ComplianceReport {
        model,
        sensitivity,
        industry,
        data_requirements: data_requirements(sensitivity),
        industry_context: industry_context(industry),
        framework_details: frameworks.iter().copied().map(framework_details).collect(),
        deployment_fit: fit,
        implementation: implementation_plan(sensitivity),
        risk: assess_risk(sensitivity, frameworks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComplianceFramework::*;

    #[test]
    fn test_restricted_data_on_public_cloud_is_high_risk() {
        let report = recommend(
            DeploymentModel::PublicCloud,
            DataSensitivity::Restricted,
            &[Gdpr],
            Industry::Healthcare,
        );
        assert_eq!(report.deployment_fit, DeploymentFit::HighRisk);
        assert_eq!(report.risk.level, RiskLevel::Critical);
        assert_eq!(report.implementation.timeline, "6-12 months for full implementation");

        let hybrid = recommend(
            DeploymentModel::HybridCloud,
            DataSensitivity::Restricted,
            &[],
            Industry::Healthcare,
        );
        assert_eq!(hybrid.deployment_fit, DeploymentFit::GoodFit);
    }

    #[test]
    fn test_confidential_fit_depends_on_hipaa_or_pci() {
        assert_eq!(
            deployment_fit(DeploymentModel::PublicCloud, DataSensitivity::Confidential, &[Gdpr]),
            DeploymentFit::Acceptable
        );
        assert_eq!(
            deployment_fit(DeploymentModel::PublicCloud, DataSensitivity::Confidential, &[Gdpr, PciDss]),
            DeploymentFit::ModerateRisk
        );
        // SOX 不影響部署評估，但會提高風險等級
        assert_eq!(
            deployment_fit(DeploymentModel::PublicCloud, DataSensitivity::Confidential, &[Sox]),
            DeploymentFit::Acceptable
        );
        assert_eq!(assess_risk(DataSensitivity::Confidential, &[Sox]).level, RiskLevel::High);
        assert_eq!(assess_risk(DataSensitivity::Confidential, &[Gdpr]).level, RiskLevel::Medium);
    }

    #[test]
    fn test_low_sensitivity_uses_standard_plan() {
        let report = recommend(
            DeploymentModel::OnPremises,
            DataSensitivity::Public,
            &[],
            Industry::TechnologySaas,
        );
        assert_eq!(report.deployment_fit, DeploymentFit::Suitable);
        assert_eq!(report.risk.level, RiskLevel::Low);
        assert_eq!(report.implementation.priorities[0], "Basic access controls");
        assert!(report.framework_details.is_empty());
        assert_eq!(report.data_requirements.backup_retention, "30 days");
        assert_eq!(report.industry_context.recommended_models, &[DeploymentModel::PublicCloud]);
    }

    #[test]
    fn test_framework_details_follow_selection_order() {
        let report = recommend(
            DeploymentModel::HybridCloud,
            DataSensitivity::Internal,
            &[Iso27001, Gdpr],
            Industry::Manufacturing,
        );
        let frameworks: Vec<_> = report.framework_details.iter().map(|d| d.framework).collect();
        assert_eq!(frameworks, vec![Iso27001, Gdpr]);
        for details in &report.framework_details {
            assert_eq!(details.deployment_impact.len(), 3);
            let hybrid = details
                .deployment_impact
                .iter()
                .find(|i| i.model == DeploymentModel::HybridCloud)
                .unwrap();
            assert!(!hybrid.favorable);
        }
    }
}
