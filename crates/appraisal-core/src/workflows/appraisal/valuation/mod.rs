mod rules;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AssetSubject, BuildingStandard, StandardCatalog, ValuationInput};

/// Building rate after the depreciation ladder has been applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBuildingRate {
    pub standard_rate: f64,
    pub depreciation_percent: f64,
    pub adjusted_rate: i64,
}

/// Monetary breakdown for a single valued component, in whole Rupiah.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationComponent {
    pub value_before_safety: i64,
    pub safety_deduction: i64,
    pub value_after_safety: i64,
    pub liquidation_value: i64,
    pub average_value: Option<i64>,
}

/// Totals over the component breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationAggregate {
    pub market_value: i64,
    pub market_value_before_safety: i64,
    pub total_safety_deduction: i64,
    pub collateral_value_after_safety: i64,
    pub liquidation_value: i64,
    pub total_average_value: Option<i64>,
}

/// Component split per asset kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuationBreakdown {
    Property {
        land: ValuationComponent,
        building: ValuationComponent,
    },
    Direct {
        component: ValuationComponent,
    },
}

/// Record of a silently substituted building standard, surfaced later as a
/// plausibility warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardFallback {
    pub requested_code: String,
    pub applied_code: String,
}

/// Derived monetary figures for one appraisal snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub breakdown: ValuationBreakdown,
    pub aggregate: ValuationAggregate,
    pub building_rate: ResolvedBuildingRate,
    pub standard_fallback: Option<StandardFallback>,
}

impl ValuationResult {
    pub fn land(&self) -> Option<&ValuationComponent> {
        match &self.breakdown {
            ValuationBreakdown::Property { land, .. } => Some(land),
            ValuationBreakdown::Direct { .. } => None,
        }
    }

    pub fn building(&self) -> Option<&ValuationComponent> {
        match &self.breakdown {
            ValuationBreakdown::Property { building, .. } => Some(building),
            ValuationBreakdown::Direct { .. } => None,
        }
    }
}

/// Stateless calculator turning survey figures into monetary values.
///
/// The calculator never fails: invalid numeric input degrades to zero so a
/// partially entered draft still produces a (zeroed) result.
pub struct ValuationEngine;

impl ValuationEngine {
    pub fn appraise(
        input: &ValuationInput,
        catalog: &StandardCatalog,
        appraisal_date: Option<NaiveDate>,
    ) -> ValuationResult {
        match &input.subject {
            AssetSubject::Property {
                land_area,
                building_area,
                land_rate,
                building_standard_code,
                year_built,
                njop_land,
                njop_building,
            } => {
                let (standard, standard_fallback) =
                    select_standard(catalog, building_standard_code.as_deref());
                let building_rate = rules::resolve_building_rate(
                    standard,
                    *year_built,
                    appraisal_date,
                    &catalog.depreciation_rules,
                );

                // Land keeps its full value; the safety margin is only taken
                // out of the building component.
                let mut land = rules::compute_component(
                    *land_area,
                    *land_rate,
                    input.safety_margin_percent,
                    input.liquidation_factor_percent,
                    false,
                );
                let mut building = rules::compute_component(
                    *building_area,
                    building_rate.adjusted_rate as f64,
                    input.safety_margin_percent,
                    input.liquidation_factor_percent,
                    true,
                );

                land.average_value =
                    rules::average_value(&[positive(land.value_before_safety), *njop_land]);
                building.average_value =
                    rules::average_value(&[positive(building.value_before_safety), *njop_building]);

                let aggregate = rules::aggregate([&land, &building]);

                ValuationResult {
                    breakdown: ValuationBreakdown::Property { land, building },
                    aggregate,
                    building_rate,
                    standard_fallback,
                }
            }
            AssetSubject::Vehicle { market_price } | AssetSubject::Machine { market_price } => {
                let component = rules::compute_component(
                    *market_price,
                    1.0,
                    input.safety_margin_percent,
                    input.liquidation_factor_percent,
                    true,
                );
                let aggregate = rules::aggregate([&component]);

                ValuationResult {
                    breakdown: ValuationBreakdown::Direct { component },
                    aggregate,
                    building_rate: ResolvedBuildingRate::default(),
                    standard_fallback: None,
                }
            }
        }
    }
}

fn positive(value: i64) -> Option<f64> {
    (value > 0).then_some(value as f64)
}

fn select_standard<'a>(
    catalog: &'a StandardCatalog,
    code: Option<&str>,
) -> (Option<&'a BuildingStandard>, Option<StandardFallback>) {
    let Some(code) = code else {
        return (None, None);
    };

    if let Some(standard) = catalog.standard_by_code(code) {
        return (Some(standard), None);
    }

    match catalog.standards.first() {
        Some(first) => (
            Some(first),
            Some(StandardFallback {
                requested_code: code.to_string(),
                applied_code: first.code.clone(),
            }),
        ),
        None => (None, None),
    }
}
