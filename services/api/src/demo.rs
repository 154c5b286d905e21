use crate::infra::{
    default_catalog, default_quality_config, InMemoryReportRepository, StaticMetadataProvider,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use appraisal_core::error::AppError;
use appraisal_core::workflows::appraisal::{
    analyze, AppraisalReportService, AssetSubject, CollateralDetail, CollateralLocation,
    ComparableAnalysisSummary, ComparableCsvImporter, DebtorIdentity, EnvironmentChecklist,
    LegalDocument, LegalDocumentKind, MarketComparable, QualityEngine, QualityEvaluation,
    ReportRecord, ReportServiceError, ReportSnapshot, ValuationBreakdown, ValuationComponent,
    ValuationEngine, ValuationInput, ValuationResult,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Appraisal date for the sample survey (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) appraisal_date: Option<NaiveDate>,
    /// Evaluation date for the quality checks (defaults to the appraisal date).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Optional comparable-sales CSV to replace the built-in comparables.
    #[arg(long)]
    pub(crate) comparables_csv: Option<PathBuf>,
    /// Print every quality check instead of the summary line only.
    #[arg(long)]
    pub(crate) show_checks: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Path to a report snapshot JSON file
    pub(crate) snapshot: PathBuf,
    /// Optional comparable-sales CSV appended to the snapshot's comparables
    #[arg(long)]
    pub(crate) comparables_csv: Option<PathBuf>,
    /// Evaluation date for the quality checks (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Compute and print the derived figures for a snapshot file, without
/// touching any stored report. Runs the exact engines the service uses.
pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.snapshot)?;
    let mut snapshot: ReportSnapshot = serde_json::from_str(&raw)?;

    if let Some(path) = args.comparables_csv {
        snapshot
            .comparables
            .extend(ComparableCsvImporter::from_path(path)?);
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let catalog = default_catalog();

    let valuation = ValuationEngine::appraise(
        &snapshot.valuation_input,
        &catalog,
        Some(snapshot.appraisal_date),
    );
    let analysis = analyze(&snapshot.comparables, &snapshot.analysis_notes);
    let evaluation =
        QualityEngine::new(default_quality_config()).evaluate(&snapshot, &valuation, today);

    println!("Valuation preview for {}", args.snapshot.display());
    render_valuation(&valuation);
    render_comparable_summary(&analysis.summary);
    render_quality(&evaluation, true);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        appraisal_date,
        today,
        comparables_csv,
        show_checks,
    } = args;

    let appraisal_date = appraisal_date.unwrap_or_else(|| Local::now().date_naive());
    let today = today.unwrap_or(appraisal_date);

    let mut snapshot = sample_snapshot(appraisal_date);
    if let Some(path) = comparables_csv {
        snapshot.comparables = ComparableCsvImporter::from_path(path)?;
    }

    let service = demo_service();

    println!("Collateral appraisal demo");
    println!("Appraisal date: {appraisal_date}, evaluation date: {today}");

    let record = service.create(snapshot, Some(today))?;
    render_record(&record, show_checks);

    let submitted = service.submit_for_review(&record.id, Some(today))?;
    println!(
        "\nReport {} admitted for review [{}]",
        submitted.id.0,
        submitted.status.label()
    );

    let approved = service.approve(&record.id)?;
    println!(
        "Supervisor approved report {} [{}]",
        approved.id.0,
        approved.status.label()
    );

    // Second act: show the gate holding back an incomplete survey.
    let mut incomplete = sample_snapshot(appraisal_date);
    incomplete.debtor.name.clear();
    incomplete.legal_documents.clear();

    let blocked = service.create(incomplete, Some(today))?;
    println!("\nSubmitting an incomplete report ({})", blocked.id.0);

    match service.submit_for_review(&blocked.id, Some(today)) {
        Err(ReportServiceError::ReviewBlocked { failures }) => {
            println!("Review blocked by {} critical check(s):", failures.len());
            for failure in failures {
                match failure.message {
                    Some(message) => println!("  - {}: {}", failure.id, message),
                    None => println!("  - {}", failure.id),
                }
            }
        }
        Ok(_) => println!("unexpectedly admitted for review"),
        Err(other) => return Err(AppError::from(other)),
    }

    Ok(())
}

fn demo_service() -> AppraisalReportService<InMemoryReportRepository, StaticMetadataProvider> {
    AppraisalReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        Arc::new(StaticMetadataProvider::default()),
        default_quality_config(),
    )
}

pub(crate) fn sample_snapshot(appraisal_date: NaiveDate) -> ReportSnapshot {
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
            description: "Main plot with residential building".to_string(),
            land_area: 120.0,
        }],
        environment: EnvironmentChecklist::default(),
        legal_documents: vec![
            LegalDocument {
                id: "doc-cert".to_string(),
                kind: LegalDocumentKind::OwnershipCertificate,
                number: Some("SHM 1024".to_string()),
                holder_name: Some("Rina Hartono".to_string()),
                issued_on: NaiveDate::from_ymd_opt(2012, 4, 2),
                due_date: NaiveDate::from_ymd_opt(2031, 3, 1),
                reminder_date: NaiveDate::from_ymd_opt(2030, 12, 1),
                verified: true,
            },
            LegalDocument {
                id: "doc-tax".to_string(),
                kind: LegalDocumentKind::TaxReceipt,
                number: Some("PBB 2024/0081".to_string()),
                holder_name: None,
                issued_on: NaiveDate::from_ymd_opt(2024, 1, 15),
                due_date: None,
                reminder_date: None,
                verified: true,
            },
        ],
        valuation_input: ValuationInput {
            subject: AssetSubject::Property {
                land_area: 120.0,
                building_area: 90.0,
                land_rate: 3_500_000.0,
                building_standard_code: Some("STD-1B".to_string()),
                year_built: Some(2012),
                njop_land: Some(380_000_000.0),
                njop_building: None,
            },
            safety_margin_percent: 20.0,
            liquidation_factor_percent: 60.0,
        },
        comparables: vec![
            MarketComparable {
                source: "Listing portal".to_string(),
                address: "Jl. Melati 4".to_string(),
                distance_meters: Some(350.0),
                land_area: 120.0,
                building_area: 0.0,
                price: 950_000_000.0,
                adjustments: Vec::new(),
                weight: Some(60.0),
                adjusted_price: None,
                final_price_per_square: None,
            },
            MarketComparable {
                source: "Broker call".to_string(),
                address: "Jl. Kenanga 9".to_string(),
                distance_meters: Some(800.0),
                land_area: 100.0,
                building_area: 70.0,
                price: 1_200_000_000.0,
                adjustments: Vec::new(),
                weight: Some(40.0),
                adjusted_price: None,
                final_price_per_square: None,
            },
        ],
        analysis_notes: vec!["Comparables within 1 km of the collateral".to_string()],
        appraisal_date,
    }
}

fn render_record(record: &ReportRecord, show_checks: bool) {
    println!("\nReport {} [{}]", record.id.0, record.status.label());
    if let Some(valuation) = &record.valuation {
        render_valuation(valuation);
    }
    if let Some(comparables) = &record.comparables {
        render_comparable_summary(&comparables.summary);
    }
    if let Some(quality) = &record.quality {
        render_quality(quality, show_checks);
    }
}

fn render_valuation(valuation: &ValuationResult) {
    match &valuation.breakdown {
        ValuationBreakdown::Property { land, building } => {
            render_component("Land", land);
            render_component("Building", building);
            println!(
                "  Building rate: {} (standard {}, depreciation {}%)",
                format_rupiah(valuation.building_rate.adjusted_rate),
                format_rupiah(valuation.building_rate.standard_rate as i64),
                valuation.building_rate.depreciation_percent
            );
        }
        ValuationBreakdown::Direct { component } => {
            render_component("Asset", component);
        }
    }

    if let Some(fallback) = &valuation.standard_fallback {
        println!(
            "  Note: building standard {} was missing, {} applied",
            fallback.requested_code, fallback.applied_code
        );
    }

    let aggregate = valuation.aggregate;
    println!("  Market value:          {}", format_rupiah(aggregate.market_value));
    println!(
        "  Collateral value:      {}",
        format_rupiah(aggregate.collateral_value_after_safety)
    );
    println!(
        "  Liquidation value:     {}",
        format_rupiah(aggregate.liquidation_value)
    );
    if let Some(average) = aggregate.total_average_value {
        println!("  Triangulated average:  {}", format_rupiah(average));
    }
}

fn render_component(name: &str, component: &ValuationComponent) {
    println!(
        "  {name}: {} before margin, {} deducted, {} liquidation",
        format_rupiah(component.value_before_safety),
        format_rupiah(component.safety_deduction),
        format_rupiah(component.liquidation_value)
    );
}

fn render_comparable_summary(summary: &ComparableAnalysisSummary) {
    println!("\nComparable analysis (total weight {})", summary.total_weight);
    match summary.weighted_average_price {
        Some(price) => println!("  Weighted average price: {}", format_rupiah(price as i64)),
        None => println!("  No weighted comparables captured"),
    }
    if let Some(per_square) = summary.weighted_average_price_per_square {
        println!(
            "  Weighted average per m2: {}",
            format_rupiah(per_square as i64)
        );
    }
    for note in &summary.notes {
        println!("  Note: {note}");
    }
}

fn render_quality(quality: &QualityEvaluation, show_checks: bool) {
    println!(
        "\nQuality checks: {}/{} passed, {} warning(s)",
        quality.summary.passed, quality.summary.total, quality.summary.warnings
    );

    if show_checks {
        for check in &quality.checks {
            let outcome = match check.message.as_deref() {
                Some(message) => format!("{:?} ({message})", check.status),
                None => format!("{:?}", check.status),
            };
            println!(
                "  [{}] {} - {}",
                check.severity.label(),
                check.id,
                outcome
            );
        }
    }

    for alert in &quality.legal_alerts {
        println!("  Legal alert: {}", alert.message);
    }
}

// Indonesian-style thousands grouping; purely a CLI display concern.
fn format_rupiah(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::new();

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}
