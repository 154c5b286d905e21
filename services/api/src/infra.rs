use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use appraisal_core::workflows::appraisal::{
    BuildingStandard, DepreciationRule, MetadataError, MetadataProvider, QualityConfig, ReportId,
    ReportRecord, ReportRepository, ReportStatus, RepositoryError, StandardCatalog,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for InMemoryReportRepository {
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

/// Seeded catalog standing in for the bank's building-standard service. The
/// whole catalog is cloned out per computation, matching the provider
/// contract.
#[derive(Clone)]
pub(crate) struct StaticMetadataProvider {
    catalog: StandardCatalog,
}

impl Default for StaticMetadataProvider {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
        }
    }
}

impl MetadataProvider for StaticMetadataProvider {
    fn catalog(&self) -> Result<StandardCatalog, MetadataError> {
        Ok(self.catalog.clone())
    }
}

pub(crate) fn default_catalog() -> StandardCatalog {
    StandardCatalog {
        standards: vec![
            BuildingStandard {
                code: "STD-1A".to_string(),
                category: "Simple residential, single storey".to_string(),
                floor_count: 1,
                base_rate: 1_500_000.0,
                specifications: vec![
                    "Brick walls, plastered and painted".to_string(),
                    "Ceramic floor tiles".to_string(),
                    "Lightweight steel roof frame".to_string(),
                ],
            },
            BuildingStandard {
                code: "STD-1B".to_string(),
                category: "Standard residential, single storey".to_string(),
                floor_count: 1,
                base_rate: 2_250_000.0,
                specifications: vec![
                    "Brick walls with architectural finish".to_string(),
                    "Granite or premium ceramic floors".to_string(),
                ],
            },
            BuildingStandard {
                code: "STD-2A".to_string(),
                category: "Standard residential, two storeys".to_string(),
                floor_count: 2,
                base_rate: 3_000_000.0,
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
                max_age: Some(30),
                percent: 30.0,
            },
            DepreciationRule {
                min_age: 30,
                max_age: None,
                percent: 40.0,
            },
        ],
    }
}

pub(crate) fn default_quality_config() -> QualityConfig {
    QualityConfig {
        max_safety_margin_percent: 50.0,
        min_land_rate: 50_000.0,
        max_land_rate: 150_000_000.0,
        land_area_tolerance: 0.5,
        comparable_weight_target: 100.0,
        comparable_weight_tolerance: 5.0,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
