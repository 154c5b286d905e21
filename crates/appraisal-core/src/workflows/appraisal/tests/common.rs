use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::appraisal::domain::{
    AssetSubject, BuildingStandard, CollateralDetail, CollateralLocation, DebtorIdentity,
    DepreciationRule, EnvironmentChecklist, LegalDocument, LegalDocumentKind, MarketComparable,
    ReportId, ReportSnapshot, StandardCatalog, ValuationInput,
};
use crate::workflows::appraisal::quality::{QualityConfig, QualityEngine};
use crate::workflows::appraisal::repository::{
    MetadataError, MetadataProvider, ReportRecord, ReportRepository, RepositoryError,
};
use crate::workflows::appraisal::service::AppraisalReportService;
use crate::workflows::appraisal::valuation::{ValuationEngine, ValuationResult};
use crate::workflows::appraisal::{report_router, ReportStatus};

pub(super) fn eval_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn catalog() -> StandardCatalog {
    StandardCatalog {
        standards: vec![
            BuildingStandard {
                code: "STD-A".to_string(),
                category: "Residential, single storey".to_string(),
                floor_count: 1,
                base_rate: 1_500_000.0,
                specifications: vec![
                    "Brick walls, plastered".to_string(),
                    "Ceramic floor tiles".to_string(),
                ],
            },
            BuildingStandard {
                code: "STD-B".to_string(),
                category: "Residential, two storeys".to_string(),
                floor_count: 2,
                base_rate: 2_500_000.0,
                specifications: vec!["Reinforced concrete frame".to_string()],
            },
        ],
        depreciation_rules: vec![
            DepreciationRule {
                min_age: 0,
                max_age: Some(5),
                percent: 10.0,
            },
            DepreciationRule {
                min_age: 5,
                max_age: Some(15),
                percent: 20.0,
            },
            DepreciationRule {
                min_age: 15,
                max_age: None,
                percent: 30.0,
            },
        ],
    }
}

pub(super) fn quality_config() -> QualityConfig {
    QualityConfig {
        max_safety_margin_percent: 50.0,
        min_land_rate: 100_000.0,
        max_land_rate: 50_000_000.0,
        land_area_tolerance: 0.5,
        comparable_weight_target: 100.0,
        comparable_weight_tolerance: 5.0,
    }
}

pub(super) fn property_input() -> ValuationInput {
    ValuationInput {
        subject: AssetSubject::Property {
            land_area: 100.0,
            building_area: 80.0,
            land_rate: 2_000_000.0,
            building_standard_code: Some("STD-A".to_string()),
            year_built: Some(2010),
            njop_land: None,
            njop_building: None,
        },
        safety_margin_percent: 20.0,
        liquidation_factor_percent: 60.0,
    }
}

pub(super) fn certificate() -> LegalDocument {
    LegalDocument {
        id: "doc-cert".to_string(),
        kind: LegalDocumentKind::OwnershipCertificate,
        number: Some("SHM 1024".to_string()),
        holder_name: Some("Rina Hartono".to_string()),
        issued_on: NaiveDate::from_ymd_opt(2012, 4, 2),
        due_date: NaiveDate::from_ymd_opt(2031, 3, 1),
        reminder_date: NaiveDate::from_ymd_opt(2030, 12, 1),
        verified: true,
    }
}

pub(super) fn tax_receipt() -> LegalDocument {
    LegalDocument {
        id: "doc-tax".to_string(),
        kind: LegalDocumentKind::TaxReceipt,
        number: Some("PBB 2024/0081".to_string()),
        holder_name: None,
        issued_on: NaiveDate::from_ymd_opt(2024, 1, 15),
        due_date: None,
        reminder_date: None,
        verified: true,
    }
}

pub(super) fn weighted_comparable(source: &str, price: f64, weight: f64) -> MarketComparable {
    MarketComparable {
        source: source.to_string(),
        address: "Jl. Anggrek 12".to_string(),
        distance_meters: Some(450.0),
        land_area: 0.0,
        building_area: 0.0,
        price,
        adjustments: Vec::new(),
        weight: Some(weight),
        adjusted_price: None,
        final_price_per_square: None,
    }
}

pub(super) fn snapshot() -> ReportSnapshot {
    ReportSnapshot {
        debtor: DebtorIdentity {
            name: "Rina Hartono".to_string(),
            identity_number: Some("3173014908760002".to_string()),
        },
        location: CollateralLocation {
            address: "Jl. Anggrek 12".to_string(),
            district: Some("Kebon Jeruk".to_string()),
            city: Some("Jakarta Barat".to_string()),
        },
        collaterals: vec![CollateralDetail {
            description: "Main plot".to_string(),
            land_area: 100.0,
        }],
        environment: EnvironmentChecklist::default(),
        legal_documents: vec![certificate(), tax_receipt()],
        valuation_input: property_input(),
        comparables: vec![
            weighted_comparable("Listing portal", 1_000_000.0, 50.0),
            weighted_comparable("Broker call", 2_000_000.0, 50.0),
        ],
        analysis_notes: vec!["Comparables within 1 km of the collateral".to_string()],
        appraisal_date: eval_date(),
    }
}

pub(super) fn incomplete_snapshot() -> ReportSnapshot {
    let mut snapshot = snapshot();
    snapshot.debtor.name = String::new();
    snapshot.legal_documents.clear();
    snapshot
}

pub(super) fn appraise(snapshot: &ReportSnapshot) -> ValuationResult {
    ValuationEngine::appraise(
        &snapshot.valuation_input,
        &catalog(),
        Some(snapshot.appraisal_date),
    )
}

pub(super) fn quality_engine() -> QualityEngine {
    QualityEngine::new(quality_config())
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for MemoryRepository {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ReportRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_status(&self, status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == status)
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl ReportRepository for ConflictRepository {
    fn insert(&self, _record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: ReportRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        Ok(None)
    }

    fn by_status(&self, _status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ReportRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_status(&self, _status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Clone)]
pub(super) struct StaticCatalog {
    catalog: StandardCatalog,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self { catalog: catalog() }
    }
}

impl MetadataProvider for StaticCatalog {
    fn catalog(&self) -> Result<StandardCatalog, MetadataError> {
        Ok(self.catalog.clone())
    }
}

pub(super) struct UnavailableMetadata;

impl MetadataProvider for UnavailableMetadata {
    fn catalog(&self) -> Result<StandardCatalog, MetadataError> {
        Err(MetadataError::Unavailable("catalog service offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AppraisalReportService<MemoryRepository, StaticCatalog>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AppraisalReportService::new(
        repository.clone(),
        Arc::new(StaticCatalog::default()),
        quality_config(),
    );
    (service, repository)
}

pub(super) fn report_router_with_service(
    service: Arc<AppraisalReportService<MemoryRepository, StaticCatalog>>,
) -> axum::Router {
    report_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
