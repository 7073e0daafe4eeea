//! Return-series statistics used by the portfolio risk panel.
//!
//! All functions take plain slices and are total: degenerate inputs (too
//! few points, zero variance) yield `None` instead of NaN.

use crate::utils::error::{HubError, Result};
use serde::Serialize;

/// Number of bars per year for an exchange interval string such as `1h`.
pub fn periods_per_year(interval: &str) -> Result<f64> {
    const MINUTES_PER_YEAR: f64 = 365.0 * 24.0 * 60.0;

    let invalid = || HubError::invalid_input("interval", interval, "expected <n>m, <n>h, <n>d or <n>w");
    let (split, _) = interval.char_indices().last().ok_or_else(invalid)?;
    let (count, unit) = interval.split_at(split);
    let count: f64 = count.parse::<u32>().map_err(|_| invalid())?.into();
    if count == 0.0 {
        return Err(invalid());
    }

    let unit_minutes = match unit {
        "m" => 1.0,
        "h" => 60.0,
        "d" => 24.0 * 60.0,
        "w" => 7.0 * 24.0 * 60.0,
        _ => return Err(invalid()),
    };
    Ok(MINUTES_PER_YEAR / (unit_minutes * count))
}

/// Simple returns `p[i] / p[i-1] - 1`. Non-positive prices end the series.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .take_while(|w| w[0] > 0.0 && w[1] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Percent change between the last price and the price `lookback` bars earlier.
pub fn change_pct(prices: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 || prices.len() <= lookback {
        return None;
    }
    let last = *prices.last()?;
    let earlier = prices[prices.len() - 1 - lookback];
    if earlier <= 0.0 {
        return None;
    }
    Some((last / earlier - 1.0) * 100.0)
}

/// Annualized volatility in percent.
pub fn annualized_volatility_pct(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    std_dev(returns).map(|sd| sd * periods_per_year.sqrt() * 100.0)
}

/// Annualized Sharpe ratio with a zero risk-free rate.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    let sd = std_dev(returns)?;
    if sd == 0.0 {
        return None;
    }
    Some(mean(returns)? / sd * periods_per_year.sqrt())
}

/// Largest peak-to-trough decline in percent (positive number).
pub fn max_drawdown_pct(prices: &[f64]) -> Option<f64> {
    let mut peak = *prices.first()?;
    let mut worst = 0.0_f64;
    for &price in prices {
        if price > peak {
            peak = price;
        }
        if peak > 0.0 {
            worst = worst.max((peak - price) / peak);
        }
    }
    Some(worst * 100.0)
}

/// Historical value-at-risk in percent (positive number = loss) at `confidence`.
pub fn historical_var_pct(returns: &[f64], confidence: f64) -> Option<f64> {
    if returns.is_empty() || !(0.0..1.0).contains(&confidence) {
        return None;
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let index = (((1.0 - confidence) * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    Some((-sorted[index]).max(0.0) * 100.0)
}

fn covariance(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[a.len() - n..], &b[b.len() - n..]);
    let (ma, mb) = (mean(a)?, mean(b)?);
    Some(a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum::<f64>() / (n - 1) as f64)
}

/// Beta of `asset` against `benchmark`; series are aligned on their most recent points.
pub fn beta(asset: &[f64], benchmark: &[f64]) -> Option<f64> {
    let n = asset.len().min(benchmark.len());
    let bench = &benchmark[benchmark.len() - n..];
    let var = std_dev(bench)?.powi(2);
    if var == 0.0 {
        return None;
    }
    Some(covariance(asset, benchmark)? / var)
}

/// Pearson correlation, aligned on the most recent points.
pub fn correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[a.len() - n..], &b[b.len() - n..]);
    let denom = std_dev(a)? * std_dev(b)?;
    if denom == 0.0 {
        return None;
    }
    Some((covariance(a, b)? / denom).clamp(-1.0, 1.0))
}

/// Weighted sum of aligned return series. Weights are renormalized over the
/// series supplied; the result has the length of the shortest series.
pub fn weighted_returns(series: &[(f64, &[f64])]) -> Vec<f64> {
    let total_weight: f64 = series.iter().map(|(w, _)| *w).sum();
    let n = series.iter().map(|(_, r)| r.len()).min().unwrap_or(0);
    if total_weight <= 0.0 || n == 0 {
        return Vec::new();
    }

    (0..n)
        .map(|i| {
            series
                .iter()
                .map(|(w, r)| w / total_weight * r[r.len() - n + i])
                .sum()
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major, `values[i][j]` is the correlation of `labels[i]` with `labels[j]`.
    /// Undefined pairs (flat series) are reported as 0.
    pub values: Vec<Vec<f64>>,
}

pub fn correlation_matrix(series: &[(String, Vec<f64>)]) -> CorrelationMatrix {
    let n = series.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let c = correlation(&series[i].1, &series[j].1).unwrap_or(0.0);
            values[i][j] = c;
            values[j][i] = c;
        }
    }

    CorrelationMatrix {
        labels: series.iter().map(|(label, _)| label.clone()).collect(),
        values,
    }
}
