use crate::domain::model::{CountryMetrics, CountryRecord};
use crate::utils::error::{MapError, Result};

pub use crate::domain::model::{BUDGET_DECIMALS, COST_LIVING_DECIMALS};

#[derive(Debug, Clone)]
pub struct TransformSettings {
    pub trip_length_days: u32,
    pub reference_country: String,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            trip_length_days: 9,
            reference_country: "Spain".to_string(),
        }
    }
}

/// 四捨六入五成雙：先放大 10^decimals，取最近的偶數整數，再縮回。
///
/// 這與 numpy/pandas `round` 的做法一致，因此 0.125 會變成 0.12，
/// 但 0.135 因為浮點誤差放大後略大於 13.5，結果是 0.14。
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// 以參考國家的原始生活成本為基準（= 1.00）計算每個國家的指標，
/// 並把每日花費換算成整趟旅程的預算
pub fn compute_metrics(
    records: &[CountryRecord],
    settings: &TransformSettings,
) -> Result<Vec<CountryMetrics>> {
    let reference = records
        .iter()
        .find(|record| record.name == settings.reference_country)
        .ok_or_else(|| MapError::ReferenceNotFoundError {
            reference: settings.reference_country.clone(),
        })?;

    let baseline = reference.cost_living_index;
    if !baseline.is_finite() || baseline == 0.0 {
        return Err(MapError::InvalidReferenceError {
            reference: settings.reference_country.clone(),
            value: baseline,
        });
    }

    let days = f64::from(settings.trip_length_days);
    let metrics = records
        .iter()
        .map(|record| CountryMetrics {
            name: record.name.clone(),
            flight_price: record.flight_price,
            cost_living_index: round_half_even(
                record.cost_living_index / baseline,
                COST_LIVING_DECIMALS,
            ),
            budget: round_half_even(record.cost_per_day * days, BUDGET_DECIMALS),
        })
        .collect();

    tracing::debug!(
        "Normalized cost of living against {} ({}), budget over {} days",
        settings.reference_country,
        baseline,
        settings.trip_length_days
    );
    Ok(metrics)
}
