use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted appraisal reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Workflow state tracked for an appraisal report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    ForReview,
    Approved,
    Rejected,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::ForReview => "for_review",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
        }
    }

    /// Survey data may only change while the appraiser still owns the report.
    pub const fn allows_edits(self) -> bool {
        matches!(self, ReportStatus::Draft | ReportStatus::Rejected)
    }
}

/// Immutable reference entry describing a building construction standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingStandard {
    pub code: String,
    pub category: String,
    pub floor_count: u8,
    /// Base construction rate in Rupiah per square meter.
    pub base_rate: f64,
    pub specifications: Vec<String>,
}

/// Age bracket of the depreciation ladder. `max_age` of `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepreciationRule {
    pub min_age: u32,
    pub max_age: Option<u32>,
    pub percent: f64,
}

/// Full reference data set the metadata provider hands to every computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardCatalog {
    pub standards: Vec<BuildingStandard>,
    pub depreciation_rules: Vec<DepreciationRule>,
}

impl StandardCatalog {
    pub fn standard_by_code(&self, code: &str) -> Option<&BuildingStandard> {
        self.standards.iter().find(|standard| standard.code == code)
    }
}

/// Closed set of collateral kinds so valuation is exhaustive over a fixed case set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetSubject {
    Property {
        land_area: f64,
        building_area: f64,
        land_rate: f64,
        #[serde(default)]
        building_standard_code: Option<String>,
        #[serde(default)]
        year_built: Option<i32>,
        #[serde(default)]
        njop_land: Option<f64>,
        #[serde(default)]
        njop_building: Option<f64>,
    },
    Vehicle {
        market_price: f64,
    },
    Machine {
        market_price: f64,
    },
}

/// Raw appraiser-entered figures feeding the valuation calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub subject: AssetSubject,
    pub safety_margin_percent: f64,
    pub liquidation_factor_percent: f64,
}

/// Price correction applied to a comparable before weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableAdjustment {
    pub factor: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Third-party transaction record used to triangulate fair value.
///
/// `adjusted_price` and `final_price_per_square` are caller-supplied overrides;
/// when absent the aggregator derives them from the raw figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketComparable {
    pub source: String,
    pub address: String,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    pub land_area: f64,
    pub building_area: f64,
    pub price: f64,
    #[serde(default)]
    pub adjustments: Vec<ComparableAdjustment>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub adjusted_price: Option<f64>,
    #[serde(default)]
    pub final_price_per_square: Option<f64>,
}

/// Document kinds the legal pass knows how to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalDocumentKind {
    OwnershipCertificate,
    BuildingPermit,
    TaxReceipt,
    Other,
}

impl LegalDocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            LegalDocumentKind::OwnershipCertificate => "Ownership Certificate",
            LegalDocumentKind::BuildingPermit => "Building Permit",
            LegalDocumentKind::TaxReceipt => "Tax Receipt",
            LegalDocumentKind::Other => "Supporting Document",
        }
    }
}

/// Legal paper attached to the collateral, as captured during the survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalDocument {
    pub id: String,
    pub kind: LegalDocumentKind,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub holder_name: Option<String>,
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_date: Option<NaiveDate>,
    #[serde(default)]
    pub verified: bool,
}

/// Appraiser-entered identity details for the debtor owning the collateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtorIdentity {
    pub name: String,
    #[serde(default)]
    pub identity_number: Option<String>,
}

/// Physical location of the surveyed collateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralLocation {
    pub address: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// One surveyed collateral object contributing land area to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralDetail {
    pub description: String,
    pub land_area: f64,
}

/// Environmental risk flags ticked during the site survey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentChecklist {
    #[serde(default)]
    pub flood_prone: bool,
    #[serde(default)]
    pub high_voltage_proximity: bool,
    #[serde(default)]
    pub limited_road_access: bool,
}

/// Severity tier of a quality check. Critical failures block the review gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSeverity {
    Critical,
    Warning,
}

impl CheckSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            CheckSeverity::Critical => "Critical",
            CheckSeverity::Warning => "Warning",
        }
    }
}

/// Outcome of a single quality check evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
}

/// Rule family a quality check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    Completeness,
    Legal,
    Consistency,
    Risk,
    Plausibility,
}

impl CheckCategory {
    pub const fn label(self) -> &'static str {
        match self {
            CheckCategory::Completeness => "Completeness",
            CheckCategory::Legal => "Legal",
            CheckCategory::Consistency => "Consistency",
            CheckCategory::Risk => "Risk",
            CheckCategory::Plausibility => "Plausibility",
        }
    }
}

/// Full survey snapshot read by the engines.
///
/// The snapshot is editable while the owning report is in draft or rejected
/// state; derived results are recomputed on every edit and on an explicit
/// recalculate action, and are read-only otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub debtor: DebtorIdentity,
    pub location: CollateralLocation,
    #[serde(default)]
    pub collaterals: Vec<CollateralDetail>,
    #[serde(default)]
    pub environment: EnvironmentChecklist,
    #[serde(default)]
    pub legal_documents: Vec<LegalDocument>,
    pub valuation_input: ValuationInput,
    #[serde(default)]
    pub comparables: Vec<MarketComparable>,
    #[serde(default)]
    pub analysis_notes: Vec<String>,
    pub appraisal_date: NaiveDate,
}
