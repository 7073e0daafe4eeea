//! Plain-text rendering of the calculator outputs for terminal use.

use crate::core::advisor::{ModelOverview, Recommendation, ResponsibilityRow, ServiceProfile};
use crate::core::compliance::ComplianceReport;
use crate::core::cost::CostBreakdown;
use crate::core::payments::{FunnelReport, PaymentTrends, TransactionHeatmap};
use crate::core::portfolio::{Forecast, PortfolioReport, PriceSource};
use crate::core::revenue::{RevenueBreakdown, RevenueProjection};
use crate::domain::model::{DeploymentModel, ServiceModel};
use crate::utils::format::{usd, usd_cents, with_thousands};
use std::fmt::Write;

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v))
}

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn bullets(out: &mut String, items: &[&str]) {
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

pub fn cost(breakdown: &CostBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} monthly estimate: {}", breakdown.model, usd(breakdown.monthly_total));
    let _ = writeln!(out, "  Annual: {}", usd(breakdown.annual_total()));
    let _ = writeln!(out, "  Base infrastructure: {}", usd(breakdown.base_infrastructure));
    let _ = writeln!(out, "  Data processing: {}", usd(breakdown.data_processing));
    let _ = writeln!(out, "  User access: {}", usd(breakdown.user_access));
    let _ = writeln!(out, "  Compliance: {}", usd(breakdown.compliance));
    let _ = writeln!(
        out,
        "  Multipliers: security x{} industry x{} size x{}",
        breakdown.security_multiplier, breakdown.industry_multiplier, breakdown.size_multiplier
    );
    out
}

pub fn comparison(breakdowns: &[CostBreakdown]) -> String {
    let mut out = String::from("Deployment model comparison (cheapest first)\n");
    let cheapest = breakdowns.first().map(|b| b.monthly_total);
    for breakdown in breakdowns {
        let delta = cheapest
            .filter(|c| *c > 0.0 && breakdown.monthly_total > *c)
            .map(|c| format!(" (+{:.0}%)", (breakdown.monthly_total / c - 1.0) * 100.0))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<14} {:>10}/mo {:>12}/yr{}",
            breakdown.model.to_string(),
            usd(breakdown.monthly_total),
            usd(breakdown.annual_total()),
            delta
        );
    }
    out
}

pub fn compliance(report: &ComplianceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Compliance review: {} / {} / {}", report.model, report.sensitivity, report.industry);
    let _ = writeln!(out, "{}", report.deployment_fit.message());
    let _ = writeln!(out, "Risk: {:?}. {}", report.risk.level, report.risk.description);

    let req = &report.data_requirements;
    let _ = writeln!(out, "\nData protection requirements");
    let _ = writeln!(out, "  Encryption: {}", req.encryption);
    let _ = writeln!(out, "  Access controls: {}", req.access_controls);
    let _ = writeln!(out, "  Data residency: {}", req.data_residency);
    let _ = writeln!(out, "  Audit logging: {}", req.audit_logging);
    let _ = writeln!(out, "  Backup retention: {}", req.backup_retention);

    let ctx = &report.industry_context;
    let _ = writeln!(out, "\nIndustry risks");
    bullets(&mut out, ctx.key_risks);
    let recommended: Vec<String> = ctx.recommended_models.iter().map(|m| m.to_string()).collect();
    let _ = writeln!(out, "  Recommended: {} ({})", recommended.join(" or "), ctx.rationale);

    for framework in &report.framework_details {
        let _ = writeln!(out, "\n{}", framework.framework);
        bullets(&mut out, framework.key_requirements);
        if let Some(impact) = framework.deployment_impact.iter().find(|i| i.model == report.model) {
            let mark = if impact.favorable { "ok" } else { "caution" };
            let _ = writeln!(out, "  [{}] {}", mark, impact.note);
        }
    }

    let plan = &report.implementation;
    let _ = writeln!(out, "\nImplementation ({} complexity, {})", plan.complexity, plan.timeline);
    for (i, step) in plan.priorities.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }
    out
}

pub fn service_profiles() -> String {
    let mut out = String::new();
    for model in [ServiceModel::Iaas, ServiceModel::Paas, ServiceModel::Saas] {
        let ServiceProfile {
            analogy,
            what_you_get,
            you_manage,
            examples,
            best_for,
            ..
        } = model.profile();
        let _ = writeln!(out, "{}: {}", model, analogy);
        let _ = writeln!(out, "  You get: {}", what_you_get);
        let _ = writeln!(out, "  You manage: {}", you_manage);
        let _ = writeln!(out, "  Examples: {}", examples.join(", "));
        let _ = writeln!(out, "  Best for: {}", best_for);
    }
    out
}

pub fn model_overviews(overviews: &[ModelOverview]) -> String {
    let mut out = String::new();
    for overview in overviews {
        let _ = writeln!(out, "{}: {}", overview.model, overview.analogy);
        let _ = writeln!(out, "  Benefits: {}", overview.benefits);
        let _ = writeln!(out, "  Challenges: {}", overview.challenges);
    }
    out
}

pub fn recommendation<T: std::fmt::Display>(title: &str, rec: &Recommendation<T>) -> String {
    format!("{}: {}\n  {}\n", title, rec.choice, rec.rationale)
}

pub fn responsibilities(rows: &[ResponsibilityRow]) -> String {
    let mut out = format!("{:<36} {:<9} {:<9} {:<9}\n", "Layer", "IaaS", "PaaS", "SaaS");
    for row in rows {
        let cells: Vec<String> = [ServiceModel::Iaas, ServiceModel::Paas, ServiceModel::Saas]
            .iter()
            .map(|m| format!("{:?}", row.owner(*m)))
            .collect();
        let _ = writeln!(out, "{:<36} {:<9} {:<9} {:<9}", row.layer, cells[0], cells[1], cells[2]);
    }
    out
}

pub fn forecast(forecast: &Forecast) -> String {
    let source = match forecast.price_source {
        PriceSource::Live => "live",
        PriceSource::Manual => "manual",
        PriceSource::Fallback => "fallback",
    };
    let mut out = format!(
        "{} scenarios from {} ({})\n{:<6} {:>14} {:>14} {:>14}\n",
        forecast.token,
        usd_cents(forecast.current_price),
        source,
        "Year",
        "Conservative",
        "Optimistic",
        "Pessimistic"
    );
    for point in &forecast.points {
        let _ = writeln!(
            out,
            "{:<6} {:>14} {:>14} {:>14}",
            point.year,
            usd(point.conservative),
            usd(point.optimistic),
            usd(point.pessimistic)
        );
    }
    out
}

pub fn portfolio(report: &PortfolioReport) -> String {
    let mut out = String::new();
    let valuation = &report.valuation;
    let mode = if valuation.live { "live prices" } else { "demo data" };
    let _ = writeln!(out, "Portfolio value: {} ({})", usd_cents(valuation.total_value), mode);

    for holding in &valuation.holdings {
        let price = holding.spot_price.map_or_else(|| "n/a".to_string(), usd_cents);
        let value = holding.value_usd.map_or_else(|| "n/a".to_string(), usd_cents);
        let _ = writeln!(out, "  {:<28} {:>3}% {:>14} {:>14}", holding.label, holding.percent, price, value);
    }

    let risk = &report.risk;
    let _ = writeln!(out, "\nRisk ({} observations)", risk.observations);
    let _ = writeln!(out, "  24h change: {}", pct(risk.change_24h_pct));
    let _ = writeln!(out, "  Volatility (annualized): {}", pct(risk.volatility_pct));
    let _ = writeln!(out, "  Sharpe ratio: {}", ratio(risk.sharpe_ratio));
    let _ = writeln!(out, "  Max drawdown: {}", pct(risk.max_drawdown_pct));
    let _ = writeln!(out, "  VaR (95%): {}", pct(risk.var_95_pct));
    let _ = writeln!(out, "  Beta vs BTC: {}", ratio(risk.beta_vs_btc));

    if let Some(matrix) = &report.correlation {
        let _ = write!(out, "\nCorrelation\n{:<9}", "");
        for label in &matrix.labels {
            let _ = write!(out, "{:>9}", label);
        }
        out.push('\n');
        for (label, row) in matrix.labels.iter().zip(&matrix.values) {
            let _ = write!(out, "{:<9}", label);
            for value in row {
                let _ = write!(out, "{:>9.2}", value);
            }
            out.push('\n');
        }
    }

    if let Some(f) = &report.forecast {
        out.push('\n');
        out.push_str(&forecast(f));
    }

    for warning in &report.warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    out
}

pub fn revenue(projection: &RevenueProjection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", projection.model_name);
    match &projection.breakdown {
        RevenueBreakdown::TransactionFees {
            monthly_transactions,
            monthly_volume,
        } => {
            let _ = writeln!(out, "  Monthly transactions: {}", with_thousands(*monthly_transactions as i64));
            let _ = writeln!(out, "  Monthly volume: {}", usd(*monthly_volume));
        }
        RevenueBreakdown::Subscription {
            subscription_revenue,
            transaction_revenue,
        } => {
            let _ = writeln!(out, "  Subscription revenue: {}", usd(*subscription_revenue));
            let _ = writeln!(out, "  Transaction revenue: {}", usd(*transaction_revenue));
        }
        RevenueBreakdown::Freemium {
            free_users,
            premium_users,
        } => {
            let _ = writeln!(out, "  Free users: {}", with_thousands(*free_users as i64));
            let _ = writeln!(out, "  Premium users: {}", with_thousands(*premium_users as i64));
        }
    }
    let _ = writeln!(out, "  Monthly revenue: {}", usd(projection.monthly_revenue));
    let _ = writeln!(out, "  Annual revenue: {}", usd(projection.annual_revenue));
    let _ = writeln!(out, "  Revenue per user: {}", usd_cents(projection.revenue_per_user));
    out
}

pub fn funnel(report: &FunnelReport) -> String {
    let mut out = String::from("Conversion funnel\n");
    for stage in &report.stages {
        let _ = write!(
            out,
            "  {:<18} {:>9} {:>7.1}% of top",
            stage.name,
            with_thousands(stage.count as i64),
            stage.from_initial_pct
        );
        if stage.name != "Website Visitors" {
            let _ = write!(out, ", {:.1}% drop-off", stage.drop_off_pct);
        }
        if let Some(hint) = stage.suggestion {
            let _ = write!(out, " -> {}", hint);
        }
        out.push('\n');
    }
    if let Some(leak) = report.biggest_leak() {
        let _ = writeln!(out, "Biggest leak: {} ({:.1}% lost)", leak.name, leak.drop_off_pct);
    }
    out
}

pub fn payments(trends: &PaymentTrends, heatmap: &TransactionHeatmap) -> String {
    let mut out = String::from("Payment method market share (%)\n");
    let _ = write!(out, "  {:<16}", "");
    for year in &trends.years {
        let _ = write!(out, "{:>6}", year);
    }
    out.push('\n');
    for series in &trends.series {
        let _ = write!(out, "  {:<16}", series.method);
        for share in &series.shares {
            let _ = write!(out, "{:>6}", share);
        }
        out.push('\n');
    }
    if let Some(method) = trends.fastest_growing() {
        let _ = writeln!(out, "Fastest growing: {}", method);
    }

    let _ = writeln!(out, "\nTransactions per day (total {})", with_thousands(heatmap.total() as i64));
    for (i, day) in heatmap.days.iter().enumerate() {
        let total = heatmap.day_total(i).unwrap_or_default();
        let _ = writeln!(out, "  {} {:>8}", day, with_thousands(total as i64));
    }
    if let Some(peak) = heatmap.peak() {
        let _ = writeln!(out, "Peak: {} {:02}:00 ({} transactions)", peak.day, peak.hour, peak.volume);
    }
    out
}

pub fn all_model_overviews() -> Vec<ModelOverview> {
    [DeploymentModel::OnPremises, DeploymentModel::PublicCloud, DeploymentModel::HybridCloud]
        .iter()
        .map(DeploymentModel::overview)
        .collect()
}
