use crate::domain::model::{choice_traits, Choice, DeploymentModel, ServiceModel};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceProfile {
    pub model: ServiceModel,
    pub analogy: &'static str,
    pub what_you_get: &'static str,
    pub you_manage: &'static str,
    pub examples: &'static [&'static str],
    pub best_for: &'static str,
}

impl ServiceModel {
    pub fn profile(&self) -> ServiceProfile {
        match self {
            ServiceModel::Iaas => ServiceProfile {
                model: *self,
                analogy: "Rent a car (you drive, maintain, fuel it)",
                what_you_get: "Virtual machines, storage, networks",
                you_manage: "Operating systems, applications, data, security patches",
                examples: &["AWS EC2", "Google Compute Engine", "Azure VMs"],
                best_for: "Custom applications, full control needed",
            },
            ServiceModel::Paas => ServiceProfile {
                model: *self,
                analogy: "Take a bus (just get on, driver handles the rest)",
                what_you_get: "Runtime environment, databases, development tools",
                you_manage: "Your application code and data",
                examples: &["Heroku", "Google App Engine", "AWS Lambda"],
                best_for: "Developers who want to code, not manage servers",
            },
            ServiceModel::Saas => ServiceProfile {
                model: *self,
                analogy: "Call a taxi (complete door-to-door service)",
                what_you_get: "Fully functional software accessible via web browser",
                you_manage: "User accounts, data input, business processes",
                examples: &["Salesforce", "Google Workspace", "Zoom", "Netflix"],
                best_for: "Business users who need tools, not technology",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Provider,
    Shared,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsibilityRow {
    pub layer: &'static str,
    pub iaas: Party,
    pub paas: Party,
    pub saas: Party,
}

impl ResponsibilityRow {
    pub fn owner(&self, model: ServiceModel) -> Party {
        match model {
            ServiceModel::Iaas => self.iaas,
            ServiceModel::Paas => self.paas,
            ServiceModel::Saas => self.saas,
        }
    }
}

/// 責任分擔矩陣：由下往上，從實體機房到業務流程
pub fn responsibility_matrix() -> Vec<ResponsibilityRow> {
    use Party::*;
    let rows: [(&'static str, Party, Party, Party); 8] = [
        ("Physical Data Centers", Provider, Provider, Provider),
        ("Network & Security Infrastructure", Provider, Provider, Provider),
        ("Virtual Machines & Storage", Provider, Provider, Provider),
        ("Operating System & Updates", Customer, Provider, Provider),
        ("Runtime & Development Tools", Customer, Provider, Provider),
        ("Application Code & Logic", Customer, Customer, Provider),
        ("User Data & Access Control", Customer, Customer, Shared),
        ("Business Processes & Training", Customer, Customer, Customer),
    ];

    rows.into_iter()
        .map(|(layer, iaas, paas, saas)| ResponsibilityRow {
            layer,
            iaas,
            paas,
            saas,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    MaximumControl,
    SpeedToMarket,
    LowestOverhead,
    CostPredictability,
}

impl Choice for Priority {
    const KIND: &'static str = "priority";

    fn all() -> &'static [Self] {
        &[
            Self::MaximumControl,
            Self::SpeedToMarket,
            Self::LowestOverhead,
            Self::CostPredictability,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::MaximumControl => "control",
            Self::SpeedToMarket => "speed",
            Self::LowestOverhead => "overhead",
            Self::CostPredictability => "cost",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::MaximumControl => "Maximum control and customization",
            Self::SpeedToMarket => "Speed to market",
            Self::LowestOverhead => "Lowest operational overhead",
            Self::CostPredictability => "Cost predictability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamExpertise {
    InfrastructureExperts,
    Developers,
    BusinessUsers,
    Mixed,
}

impl Choice for TeamExpertise {
    const KIND: &'static str = "team expertise";

    fn all() -> &'static [Self] {
        &[
            Self::InfrastructureExperts,
            Self::Developers,
            Self::BusinessUsers,
            Self::Mixed,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::InfrastructureExperts => "infrastructure",
            Self::Developers => "developers",
            Self::BusinessUsers => "business",
            Self::Mixed => "mixed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::InfrastructureExperts => "We have infrastructure experts",
            Self::Developers => "We're mainly developers",
            Self::BusinessUsers => "We're business users",
            Self::Mixed => "Mixed technical skills",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryConcern {
    SecurityControl,
    LowestInitialCost,
    TimeToMarket,
    Flexibility,
}

impl Choice for PrimaryConcern {
    const KIND: &'static str = "primary concern";

    fn all() -> &'static [Self] {
        &[
            Self::SecurityControl,
            Self::LowestInitialCost,
            Self::TimeToMarket,
            Self::Flexibility,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::SecurityControl => "security",
            Self::LowestInitialCost => "initial-cost",
            Self::TimeToMarket => "time-to-market",
            Self::Flexibility => "flexibility",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::SecurityControl => "Maximum security/control",
            Self::LowestInitialCost => "Lowest initial cost",
            Self::TimeToMarket => "Fastest time to market",
            Self::Flexibility => "Flexibility/future-proofing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkloadPattern {
    Predictable,
    Spiky,
    Unpredictable,
    Mixed,
}

impl Choice for WorkloadPattern {
    const KIND: &'static str = "workload pattern";

    fn all() -> &'static [Self] {
        &[Self::Predictable, Self::Spiky, Self::Unpredictable, Self::Mixed]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Predictable => "predictable",
            Self::Spiky => "spiky",
            Self::Unpredictable => "unpredictable",
            Self::Mixed => "mixed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Predictable => "Very predictable (same every day)",
            Self::Spiky => "Some spikes (seasonal/events)",
            Self::Unpredictable => "Completely unpredictable",
            Self::Mixed => "Mix of both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamProfile {
    InfrastructureExperts,
    Developers,
    SmallTeam,
    Mixed,
}

impl Choice for TeamProfile {
    const KIND: &'static str = "team profile";

    fn all() -> &'static [Self] {
        &[Self::InfrastructureExperts, Self::Developers, Self::SmallTeam, Self::Mixed]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::InfrastructureExperts => "infrastructure",
            Self::Developers => "developers",
            Self::SmallTeam => "small",
            Self::Mixed => "mixed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::InfrastructureExperts => "We have lots of infrastructure experts",
            Self::Developers => "We're mostly developers",
            Self::SmallTeam => "Small team, need managed services",
            Self::Mixed => "Mixed skills",
        }
    }
}

choice_traits!(Priority, TeamExpertise, PrimaryConcern, WorkloadPattern, TeamProfile);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation<T> {
    pub choice: T,
    pub rationale: &'static str,
}

pub fn recommend_service_model(
    priority: Priority,
    expertise: TeamExpertise,
) -> Recommendation<ServiceModel> {
    let (choice, rationale) = match (priority, expertise) {
        (Priority::MaximumControl, TeamExpertise::InfrastructureExperts) => {
            (ServiceModel::Iaas, "You have the skills to manage everything")
        }
        (Priority::MaximumControl, _) => {
            (ServiceModel::Paas, "Get control without infrastructure complexity")
        }
        (Priority::SpeedToMarket, TeamExpertise::BusinessUsers) => {
            (ServiceModel::Saas, "Get started immediately with ready solutions")
        }
        (Priority::SpeedToMarket, _) => {
            (ServiceModel::Paas, "Deploy fast without infrastructure setup")
        }
        (Priority::LowestOverhead, _) => {
            (ServiceModel::Saas, "Let someone else handle all the operations")
        }
        (Priority::CostPredictability, _) => {
            (ServiceModel::Iaas, "Most predictable long-term costs at scale")
        }
    };
    Recommendation { choice, rationale }
}

/// 部署模式決策：團隊組成目前不影響結果，只保留作為輸入紀錄
pub fn recommend_deployment(
    concern: PrimaryConcern,
    workload: WorkloadPattern,
    _team: TeamProfile,
) -> Recommendation<DeploymentModel> {
    let (choice, rationale) = match concern {
        PrimaryConcern::SecurityControl => {
            (DeploymentModel::OnPremises, "You value control over convenience")
        }
        PrimaryConcern::TimeToMarket => {
            (DeploymentModel::PublicCloud, "Get started in minutes, not months")
        }
        PrimaryConcern::Flexibility => {
            (DeploymentModel::HybridCloud, "Best of both worlds, harder to manage")
        }
        PrimaryConcern::LowestInitialCost if workload == WorkloadPattern::Predictable => (
            DeploymentModel::OnPremises,
            "Predictable workload = predictable costs",
        ),
        PrimaryConcern::LowestInitialCost => {
            (DeploymentModel::PublicCloud, "Pay only for what you use")
        }
    };
    Recommendation { choice, rationale }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOverview {
    pub model: DeploymentModel,
    pub analogy: &'static str,
    pub benefits: &'static str,
    pub challenges: &'static str,
}

impl DeploymentModel {
    pub fn overview(&self) -> ModelOverview {
        let (analogy, benefits, challenges) = match self {
            DeploymentModel::OnPremises => (
                "Build on your own land (you control everything)",
                "Complete control, data never leaves your building",
                "High upfront costs, you handle all maintenance",
            ),
            DeploymentModel::PublicCloud => (
                "Rent a managed apartment (provider handles maintenance)",
                "Pay-as-you-go, automatic updates, global scale",
                "Ongoing costs, less control, internet dependency",
            ),
            DeploymentModel::HybridCloud => (
                "Own a house + rent city apartment (best of both worlds)",
                "Keep sensitive data private, burst to cloud when needed",
                "More complex to manage, need expertise in both",
            ),
        };
        ModelOverview {
            model: *self,
            analogy,
            benefits,
            challenges,
        }
    }
}
