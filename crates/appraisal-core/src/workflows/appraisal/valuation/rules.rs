use chrono::{Datelike, Local, NaiveDate};

use super::super::domain::{BuildingStandard, DepreciationRule};
use super::{ResolvedBuildingRate, ValuationAggregate, ValuationComponent};

/// Drafts are legitimately incomplete mid-entry, so invalid numerics degrade
/// to zero instead of failing the whole computation.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub(crate) fn sanitize_percent(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        0.0
    } else if value > 100.0 {
        100.0
    } else {
        value
    }
}

fn round_rupiah(value: f64) -> i64 {
    value.round() as i64
}

pub(crate) fn resolve_building_rate(
    standard: Option<&BuildingStandard>,
    year_built: Option<i32>,
    reference_date: Option<NaiveDate>,
    rules: &[DepreciationRule],
) -> ResolvedBuildingRate {
    let Some(standard) = standard else {
        return ResolvedBuildingRate::default();
    };

    let standard_rate = sanitize(standard.base_rate);
    let depreciation_percent = match year_built {
        Some(year_built) => {
            let reference_year = reference_date
                .map(|date| date.year())
                .unwrap_or_else(|| Local::now().year());
            let age = (reference_year - year_built).max(0) as u32;
            rules
                .iter()
                .find(|rule| age >= rule.min_age && rule.max_age.map_or(true, |max| age < max))
                .map(|rule| sanitize_percent(rule.percent))
                .unwrap_or(0.0)
        }
        None => 0.0,
    };

    let adjusted_rate = round_rupiah(standard_rate * (1.0 - depreciation_percent / 100.0));

    ResolvedBuildingRate {
        standard_rate,
        depreciation_percent,
        adjusted_rate,
    }
}

pub(crate) fn compute_component(
    area: f64,
    rate: f64,
    safety_margin_percent: f64,
    liquidation_factor_percent: f64,
    apply_safety: bool,
) -> ValuationComponent {
    let value_before_safety = round_rupiah(sanitize(area) * sanitize(rate));

    let safety_deduction = if apply_safety {
        round_rupiah(value_before_safety as f64 * sanitize_percent(safety_margin_percent) / 100.0)
    } else {
        0
    };

    let value_after_safety = value_before_safety - safety_deduction;
    let liquidation_value = round_rupiah(
        value_after_safety as f64 * sanitize_percent(liquidation_factor_percent) / 100.0,
    );

    ValuationComponent {
        value_before_safety,
        safety_deduction,
        value_after_safety,
        liquidation_value,
        average_value: None,
    }
}

/// Triangulation figure over the defined positive candidates. Distinct from
/// the adopted value and never fed back into the aggregate.
pub(crate) fn average_value(candidates: &[Option<f64>]) -> Option<i64> {
    let positive: Vec<f64> = candidates
        .iter()
        .flatten()
        .copied()
        .filter(|value| value.is_finite() && *value > 0.0)
        .collect();

    if positive.is_empty() {
        return None;
    }

    Some(round_rupiah(
        positive.iter().sum::<f64>() / positive.len() as f64,
    ))
}

/// Aggregate fields are sums of the already-rounded component fields and are
/// never re-rounded. Market value is reported before the safety margin; the
/// margin only affects the downstream collateral value.
pub(crate) fn aggregate<'a>(
    components: impl IntoIterator<Item = &'a ValuationComponent>,
) -> ValuationAggregate {
    let mut totals = ValuationAggregate::default();
    let mut any_average = false;
    let mut average_sum: i64 = 0;

    for component in components {
        totals.market_value_before_safety += component.value_before_safety;
        totals.total_safety_deduction += component.safety_deduction;
        totals.collateral_value_after_safety += component.value_after_safety;
        totals.liquidation_value += component.liquidation_value;
        if let Some(average) = component.average_value {
            any_average = true;
            average_sum += average;
        }
    }

    totals.market_value = totals.market_value_before_safety;
    totals.total_average_value = any_average.then_some(average_sum);
    totals
}
