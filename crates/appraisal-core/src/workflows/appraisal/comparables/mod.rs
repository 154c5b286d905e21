mod importer;

pub use importer::{ComparableCsvImporter, ComparableImportError};

use serde::{Deserialize, Serialize};

use super::domain::MarketComparable;

/// Per-comparable figures derived from the raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedComparable {
    pub comparable: MarketComparable,
    pub adjusted_price: f64,
    pub final_price_per_square: Option<f64>,
}

/// Weighted market-price estimate over the comparables carrying a weight.
///
/// `total_weight` is returned verbatim so callers can flag deviation from
/// 100; `notes` is a pass-through slot for caller-supplied commentary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparableAnalysisSummary {
    pub weighted_average_price: Option<f64>,
    pub weighted_average_price_per_square: Option<f64>,
    pub total_weight: f64,
    pub notes: Vec<String>,
}

/// Analyzer output: derived rows plus the weighted summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableAnalysis {
    pub comparables: Vec<AnalyzedComparable>,
    pub summary: ComparableAnalysisSummary,
}

/// Aggregate market comparables into a triangulated estimate.
///
/// Comparables without an explicit weight are reference-only: they appear in
/// the derived rows but are excluded from the averages rather than defaulted
/// to an equal share. Empty or all-unweighted input yields a zero-weight
/// summary, never an error.
pub fn analyze(comparables: &[MarketComparable], notes: &[String]) -> ComparableAnalysis {
    let analyzed: Vec<AnalyzedComparable> = comparables.iter().map(derive_row).collect();

    let mut total_weight = 0.0;
    let mut price_numerator = 0.0;
    let mut price_denominator = 0.0;
    let mut per_square_numerator = 0.0;
    let mut per_square_denominator = 0.0;

    for entry in &analyzed {
        let Some(weight) = entry
            .comparable
            .weight
            .filter(|weight| weight.is_finite() && *weight >= 0.0)
        else {
            continue;
        };

        total_weight += weight;
        price_numerator += entry.adjusted_price * weight;
        price_denominator += weight;

        if let Some(per_square) = entry.final_price_per_square {
            per_square_numerator += per_square * weight;
            per_square_denominator += weight;
        }
    }

    let summary = ComparableAnalysisSummary {
        weighted_average_price: (price_denominator > 0.0)
            .then(|| price_numerator / price_denominator),
        weighted_average_price_per_square: (per_square_denominator > 0.0)
            .then(|| per_square_numerator / per_square_denominator),
        total_weight,
        notes: notes.to_vec(),
    };

    ComparableAnalysis {
        comparables: analyzed,
        summary,
    }
}

fn derive_row(comparable: &MarketComparable) -> AnalyzedComparable {
    let adjusted_price = comparable.adjusted_price.unwrap_or_else(|| {
        comparable.price
            + comparable
                .adjustments
                .iter()
                .map(|adjustment| adjustment.amount)
                .sum::<f64>()
    });

    let total_area = comparable.land_area + comparable.building_area;
    let final_price_per_square = if total_area > 0.0 {
        Some(adjusted_price / total_area)
    } else {
        comparable.final_price_per_square
    };

    AnalyzedComparable {
        comparable: comparable.clone(),
        adjusted_price,
        final_price_per_square,
    }
}
