use crate::utils::rng::SeededRng;
use serde::Serialize;

pub const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShareSeries {
    pub method: &'static str,
    /// Market share in percent, one value per year
    pub shares: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentTrends {
    pub years: Vec<i32>,
    pub series: Vec<MarketShareSeries>,
}

impl PaymentTrends {
    /// Change in share points from the first to the last year.
    pub fn share_shift(&self, method: &str) -> Option<i64> {
        let series = self.series.iter().find(|s| s.method == method)?;
        let first = *series.shares.first()? as i64;
        let last = *series.shares.last()? as i64;
        Some(last - first)
    }

    pub fn fastest_growing(&self) -> Option<&'static str> {
        self.series
            .iter()
            .filter_map(|s| self.share_shift(s.method).map(|shift| (s.method, shift)))
            .max_by_key(|(_, shift)| *shift)
            .map(|(method, _)| method)
    }
}

pub fn payment_method_trends() -> PaymentTrends {
    let series = [
        ("Credit Cards", [40, 38, 36, 35, 33]),
        ("Digital Wallets", [20, 25, 28, 32, 35]),
        ("Bank Transfers", [15, 15, 14, 13, 12]),
        ("BNPL", [5, 8, 12, 15, 18]),
        ("Cryptocurrency", [1, 2, 3, 4, 5]),
    ];

    PaymentTrends {
        years: (2020..=2024).collect(),
        series: series
            .into_iter()
            .map(|(method, shares)| MarketShareSeries {
                method,
                shares: shares.to_vec(),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelModel {
    pub visitors: u64,
    /// Conversion from the previous stage, as fractions
    pub signup_rate: f64,
    pub kyc_rate: f64,
    pub first_payment_rate: f64,
    pub active_rate: f64,
    pub power_user_rate: f64,
}

impl Default for FunnelModel {
    fn default() -> Self {
        Self {
            visitors: 100_000,
            signup_rate: 0.15,
            kyc_rate: 0.75,
            first_payment_rate: 0.60,
            active_rate: 0.70,
            power_user_rate: 0.30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub name: &'static str,
    pub count: u64,
    /// Percent of the previous stage that reached this one
    pub from_previous_pct: f64,
    /// Percent of the top of the funnel that reached this one
    pub from_initial_pct: f64,
    pub drop_off_pct: f64,
    pub suggestion: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelReport {
    pub stages: Vec<FunnelStage>,
}

impl FunnelReport {
    /// Stage losing the largest share of its predecessor.
    pub fn biggest_leak(&self) -> Option<&FunnelStage> {
        self.stages
            .iter()
            .skip(1)
            .max_by(|a, b| a.drop_off_pct.total_cmp(&b.drop_off_pct))
    }
}

fn stage_suggestion(name: &str) -> Option<&'static str> {
    match name {
        "KYC Completed" => Some("Streamline verification process"),
        "First Payment" => Some("Improve onboarding UX"),
        "Active Users" => Some("Implement loyalty program"),
        _ => None,
    }
}

/// 客戶轉換漏斗，每一階段人數四捨五入
pub fn conversion_funnel(model: &FunnelModel) -> FunnelReport {
    let steps: [(&'static str, f64); 6] = [
        ("Website Visitors", 1.0),
        ("Sign-ups", model.signup_rate),
        ("KYC Completed", model.kyc_rate),
        ("First Payment", model.first_payment_rate),
        ("Active Users", model.active_rate),
        ("Power Users", model.power_user_rate),
    ];

    let mut stages = Vec::with_capacity(steps.len());
    let mut previous = model.visitors as f64;
    for (name, rate) in steps {
        let count = (previous * rate).round();
        let from_previous_pct = if previous > 0.0 { count / previous * 100.0 } else { 0.0 };
        let from_initial_pct = if model.visitors > 0 {
            count / model.visitors as f64 * 100.0
        } else {
            0.0
        };
        stages.push(FunnelStage {
            name,
            count: count as u64,
            from_previous_pct,
            from_initial_pct,
            drop_off_pct: 100.0 - from_previous_pct,
            suggestion: stage_suggestion(name),
        });
        previous = count;
    }

    FunnelReport { stages }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapPeak {
    pub day: &'static str,
    pub hour: usize,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionHeatmap {
    pub days: Vec<&'static str>,
    /// `volumes[day][hour]`
    pub volumes: Vec<Vec<u64>>,
}

impl TransactionHeatmap {
    /// Poisson(λ) baseline per hour; weekday business hours (09-17) ×1.5,
    /// weekend afternoons and evenings (10-21) ×1.2, truncated.
    pub fn generate(seed: u64, base_rate: f64) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut volumes = vec![vec![0u64; 24]; 7];

        for (day, row) in volumes.iter_mut().enumerate() {
            for (hour, cell) in row.iter_mut().enumerate() {
                let sample = rng.poisson(base_rate) as f64;
                let factor = match (day, hour) {
                    (0..=4, 9..=17) => 1.5,
                    (5..=6, 10..=21) => 1.2,
                    _ => 1.0,
                };
                *cell = (sample * factor) as u64;
            }
        }

        Self {
            days: DAYS.to_vec(),
            volumes,
        }
    }

    pub fn peak(&self) -> Option<HeatmapPeak> {
        self.volumes
            .iter()
            .enumerate()
            .flat_map(|(day, row)| row.iter().enumerate().map(move |(hour, v)| (day, hour, *v)))
            .max_by_key(|(_, _, v)| *v)
            .map(|(day, hour, volume)| HeatmapPeak {
                day: self.days[day],
                hour,
                volume,
            })
    }

    pub fn total(&self) -> u64 {
        self.volumes.iter().flatten().sum()
    }

    pub fn day_total(&self, day: usize) -> Option<u64> {
        self.volumes.get(day).map(|row| row.iter().sum())
    }
}
