use crate::utils::error::Result;
use crate::utils::validation::{validate_input_range, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum RevenueModel {
    TransactionFees {
        /// Percent of volume, e.g. 2.9
        fee_rate_pct: f64,
        /// Flat fee per transaction in USD
        fixed_fee: f64,
    },
    Subscription {
        monthly_fee: f64,
        reduced_fee_rate_pct: f64,
    },
    Freemium {
        conversion_rate_pct: f64,
        premium_price: f64,
    },
}

impl RevenueModel {
    pub fn name(&self) -> &'static str {
        match self {
            RevenueModel::TransactionFees { .. } => "Transaction Fees",
            RevenueModel::Subscription { .. } => "Subscription + Fees",
            RevenueModel::Freemium { .. } => "Freemium Model",
        }
    }

    pub fn default_transaction_fees() -> Self {
        RevenueModel::TransactionFees {
            fee_rate_pct: 2.9,
            fixed_fee: 0.30,
        }
    }

    pub fn default_subscription() -> Self {
        RevenueModel::Subscription {
            monthly_fee: 20.0,
            reduced_fee_rate_pct: 1.9,
        }
    }

    pub fn default_freemium() -> Self {
        RevenueModel::Freemium {
            conversion_rate_pct: 5.0,
            premium_price: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueInputs {
    pub monthly_users: u64,
    pub avg_transaction: f64,
    pub transactions_per_user: u32,
    pub model: RevenueModel,
}

impl Default for RevenueInputs {
    fn default() -> Self {
        Self {
            monthly_users: 100_000,
            avg_transaction: 75.0,
            transactions_per_user: 8,
            model: RevenueModel::default_transaction_fees(),
        }
    }
}

impl Validate for RevenueInputs {
    fn validate(&self) -> Result<()> {
        validate_input_range("monthly_users", self.monthly_users, 1_000, 10_000_000)?;
        validate_input_range("avg_transaction", self.avg_transaction, 10.0, 1_000.0)?;
        validate_input_range("transactions_per_user", self.transactions_per_user, 1, 50)?;

        match self.model {
            RevenueModel::TransactionFees {
                fee_rate_pct,
                fixed_fee,
            } => {
                validate_input_range("fee_rate_pct", fee_rate_pct, 1.0, 5.0)?;
                validate_input_range("fixed_fee", fixed_fee, 0.0, 1.0)?;
            }
            RevenueModel::Subscription {
                monthly_fee,
                reduced_fee_rate_pct,
            } => {
                validate_input_range("monthly_fee", monthly_fee, 5.0, 100.0)?;
                validate_input_range("reduced_fee_rate_pct", reduced_fee_rate_pct, 0.5, 3.0)?;
            }
            RevenueModel::Freemium {
                conversion_rate_pct,
                premium_price,
            } => {
                validate_input_range("conversion_rate_pct", conversion_rate_pct, 1.0, 20.0)?;
                validate_input_range("premium_price", premium_price, 10.0, 200.0)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum RevenueBreakdown {
    TransactionFees {
        monthly_transactions: u64,
        monthly_volume: f64,
    },
    Subscription {
        subscription_revenue: f64,
        transaction_revenue: f64,
    },
    Freemium {
        free_users: u64,
        premium_users: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueProjection {
    pub model_name: &'static str,
    pub breakdown: RevenueBreakdown,
    pub monthly_revenue: f64,
    pub annual_revenue: f64,
    pub revenue_per_user: f64,
}

/// 依營收模式計算月營收與單位經濟
pub fn project_revenue(inputs: &RevenueInputs) -> Result<RevenueProjection> {
    inputs.validate()?;

    let users = inputs.monthly_users as f64;
    let tpu = inputs.transactions_per_user as f64;

    let (breakdown, monthly_revenue) = match inputs.model {
        RevenueModel::TransactionFees {
            fee_rate_pct,
            fixed_fee,
        } => {
            let monthly_transactions = inputs.monthly_users * inputs.transactions_per_user as u64;
            let monthly_volume = monthly_transactions as f64 * inputs.avg_transaction;
            let revenue = monthly_volume * fee_rate_pct / 100.0 + monthly_transactions as f64 * fixed_fee;
            (
                RevenueBreakdown::TransactionFees {
                    monthly_transactions,
                    monthly_volume,
                },
                revenue,
            )
        }
        RevenueModel::Subscription {
            monthly_fee,
            reduced_fee_rate_pct,
        } => {
            let subscription_revenue = users * monthly_fee;
            let transaction_revenue = users * tpu * inputs.avg_transaction * reduced_fee_rate_pct / 100.0;
            (
                RevenueBreakdown::Subscription {
                    subscription_revenue,
                    transaction_revenue,
                },
                subscription_revenue + transaction_revenue,
            )
        }
        RevenueModel::Freemium {
            conversion_rate_pct,
            premium_price,
        } => {
            let paid_users = users * conversion_rate_pct / 100.0;
            (
                RevenueBreakdown::Freemium {
                    free_users: (users - paid_users) as u64,
                    premium_users: paid_users as u64,
                },
                paid_users * premium_price,
            )
        }
    };

    let revenue_per_user = if inputs.monthly_users > 0 {
        monthly_revenue / users
    } else {
        0.0
    };

    tracing::debug!(
        "📈 {} revenue: monthly={:.2} per_user={:.2}",
        inputs.model.name(),
        monthly_revenue,
        revenue_per_user
    );

    Ok(RevenueProjection {
        model_name: inputs.model.name(),
        breakdown,
        monthly_revenue,
        annual_revenue: monthly_revenue * 12.0,
        revenue_per_user,
    })
}
