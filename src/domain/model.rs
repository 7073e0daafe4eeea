use crate::utils::error::{HubError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A closed set of options that can be parsed from a kebab-case key,
/// an alias, or its display label.
pub trait Choice: Sized + Copy + 'static {
    const KIND: &'static str;

    fn all() -> &'static [Self];
    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn parse_choice(input: &str) -> Result<Self> {
        let wanted = normalize(input);
        Self::all()
            .iter()
            .copied()
            .find(|choice| {
                normalize(choice.key()) == wanted
                    || normalize(choice.label()) == wanted
                    || choice.aliases().iter().any(|alias| normalize(alias) == wanted)
            })
            .ok_or_else(|| HubError::UnknownOptionError {
                kind: Self::KIND.to_string(),
                value: input.to_string(),
                expected: Self::all()
                    .iter()
                    .map(|c| c.key())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentModel {
    OnPremises,
    PublicCloud,
    HybridCloud,
}

impl Choice for DeploymentModel {
    const KIND: &'static str = "deployment model";

    fn all() -> &'static [Self] {
        &[Self::OnPremises, Self::PublicCloud, Self::HybridCloud]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::OnPremises => "on-premises",
            Self::PublicCloud => "public-cloud",
            Self::HybridCloud => "hybrid-cloud",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::OnPremises => "On-premises",
            Self::PublicCloud => "Public Cloud",
            Self::HybridCloud => "Hybrid Cloud",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::OnPremises => &["on-prem", "onprem", "private"],
            Self::PublicCloud => &["public", "cloud"],
            Self::HybridCloud => &["hybrid"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanySize {
    Startup,
    Sme,
    Enterprise,
}

impl Choice for CompanySize {
    const KIND: &'static str = "company size";

    fn all() -> &'static [Self] {
        &[Self::Startup, Self::Sme, Self::Enterprise]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Sme => "sme",
            Self::Enterprise => "enterprise",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Startup => "Startup (1-50 employees)",
            Self::Sme => "SME (51-500 employees)",
            Self::Enterprise => "Enterprise (500+ employees)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Industry {
    FinancialServices,
    Healthcare,
    EcommerceRetail,
    Manufacturing,
    Government,
    TechnologySaas,
}

impl Choice for Industry {
    const KIND: &'static str = "industry";

    fn all() -> &'static [Self] {
        &[
            Self::FinancialServices,
            Self::Healthcare,
            Self::EcommerceRetail,
            Self::Manufacturing,
            Self::Government,
            Self::TechnologySaas,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::FinancialServices => "financial-services",
            Self::Healthcare => "healthcare",
            Self::EcommerceRetail => "ecommerce-retail",
            Self::Manufacturing => "manufacturing",
            Self::Government => "government",
            Self::TechnologySaas => "technology-saas",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::FinancialServices => "Financial Services",
            Self::Healthcare => "Healthcare",
            Self::EcommerceRetail => "E-commerce/Retail",
            Self::Manufacturing => "Manufacturing",
            Self::Government => "Government",
            Self::TechnologySaas => "Technology/SaaS",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::FinancialServices => &["finance", "fintech", "banking"],
            Self::EcommerceRetail => &["ecommerce", "retail"],
            Self::TechnologySaas => &["technology", "saas", "tech"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSensitivity {
    Public,
    Internal,
    Confidential,
    Restricted,
}

impl Choice for DataSensitivity {
    const KIND: &'static str = "data sensitivity";

    fn all() -> &'static [Self] {
        &[Self::Public, Self::Internal, Self::Confidential, Self::Restricted]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Confidential => "confidential",
            Self::Restricted => "restricted",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Public => "Public (marketing data)",
            Self::Internal => "Internal (business metrics)",
            Self::Confidential => "Confidential (customer PII)",
            Self::Restricted => "Restricted (financial/health records)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceFramework {
    #[serde(rename = "GDPR")]
    Gdpr,
    #[serde(rename = "HIPAA")]
    Hipaa,
    #[serde(rename = "SOX")]
    Sox,
    #[serde(rename = "PCI-DSS")]
    PciDss,
    #[serde(rename = "ISO 27001")]
    Iso27001,
}

impl Choice for ComplianceFramework {
    const KIND: &'static str = "compliance framework";

    fn all() -> &'static [Self] {
        &[Self::Gdpr, Self::Hipaa, Self::Sox, Self::PciDss, Self::Iso27001]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Gdpr => "gdpr",
            Self::Hipaa => "hipaa",
            Self::Sox => "sox",
            Self::PciDss => "pci-dss",
            Self::Iso27001 => "iso-27001",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Hipaa => "HIPAA",
            Self::Sox => "SOX",
            Self::PciDss => "PCI-DSS",
            Self::Iso27001 => "ISO 27001",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::PciDss => &["pci"],
            Self::Iso27001 => &["iso27001", "iso"],
            _ => &[],
        }
    }
}

impl ComplianceFramework {
    /// Parse a comma separated list. `none` means no frameworks and is
    /// dropped; duplicates collapse to the first occurrence.
    pub fn parse_list(input: &str) -> Result<Vec<Self>> {
        let mut frameworks = Vec::new();
        for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if item.eq_ignore_ascii_case("none") {
                continue;
            }
            let framework = Self::parse_choice(item)?;
            if !frameworks.contains(&framework) {
                frameworks.push(framework);
            }
        }
        Ok(frameworks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkIsolation {
    Basic,
    Standard,
    High,
    Maximum,
}

impl Choice for NetworkIsolation {
    const KIND: &'static str = "network isolation level";

    fn all() -> &'static [Self] {
        &[Self::Basic, Self::Standard, Self::High, Self::Maximum]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::High => "high",
            Self::Maximum => "maximum",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Standard => "Standard",
            Self::High => "High",
            Self::Maximum => "Maximum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceModel {
    Iaas,
    Paas,
    Saas,
}

impl Choice for ServiceModel {
    const KIND: &'static str = "service model";

    fn all() -> &'static [Self] {
        &[Self::Iaas, Self::Paas, Self::Saas]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Iaas => "iaas",
            Self::Paas => "paas",
            Self::Saas => "saas",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Iaas => "IaaS (Infrastructure as a Service)",
            Self::Paas => "PaaS (Platform as a Service)",
            Self::Saas => "SaaS (Software as a Service)",
        }
    }
}

macro_rules! choice_traits {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::str::FromStr for $ty {
                type Err = $crate::utils::error::HubError;

                fn from_str(s: &str) -> $crate::utils::error::Result<Self> {
                    <Self as $crate::domain::model::Choice>::parse_choice(s)
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(<Self as $crate::domain::model::Choice>::label(self))
                }
            }
        )*
    };
}

pub(crate) use choice_traits;

choice_traits!(
    DeploymentModel,
    CompanySize,
    Industry,
    DataSensitivity,
    ComplianceFramework,
    NetworkIsolation,
    ServiceModel,
);

/// Spot prices keyed by CoinGecko token id, in one quote currency.
pub type SpotPrices = BTreeMap<String, f64>;

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
