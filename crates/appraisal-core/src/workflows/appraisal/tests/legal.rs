use chrono::NaiveDate;

use super::common::*;
use crate::workflows::appraisal::domain::{LegalDocument, LegalDocumentKind};

fn alerts_for(documents: Vec<LegalDocument>) -> Vec<crate::workflows::appraisal::LegalAlert> {
    let mut snapshot = snapshot();
    snapshot.legal_documents = documents;
    let valuation = appraise(&snapshot);
    quality_engine()
        .evaluate(&snapshot, &valuation, eval_date())
        .legal_alerts
}

#[test]
fn documents_in_good_standing_raise_no_alerts() {
    let alerts = alerts_for(vec![certificate(), tax_receipt()]);
    assert!(alerts.is_empty());
}

#[test]
fn a_past_due_date_raises_an_expired_alert() {
    let mut document = certificate();
    document.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);
    document.reminder_date = NaiveDate::from_ymd_opt(2023, 10, 1);

    let alerts = alerts_for(vec![document]);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "doc-cert-expired");
    assert_eq!(alerts[0].document_id, "doc-cert");
    assert!(alerts[0].message.contains("expired"));
}

#[test]
fn a_due_date_on_the_evaluation_day_counts_as_expired() {
    let mut document = certificate();
    document.due_date = Some(eval_date());
    document.reminder_date = None;

    let alerts = alerts_for(vec![document]);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "doc-cert-expired");
}

#[test]
fn a_reached_reminder_date_raises_a_pre_due_warning() {
    let mut document = certificate();
    document.due_date = NaiveDate::from_ymd_opt(2025, 3, 1);
    document.reminder_date = NaiveDate::from_ymd_opt(2024, 6, 1);

    let alerts = alerts_for(vec![document]);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "doc-cert-reminder");
    assert!(alerts[0].message.contains("approaching"));
}

#[test]
fn missing_certificate_fields_are_reported() {
    let mut document = certificate();
    document.number = None;
    document.holder_name = Some("   ".to_string());

    let alerts = alerts_for(vec![document]);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "doc-cert-missing-fields");
    assert!(alerts[0].message.contains("certificate number"));
    assert!(alerts[0].message.contains("holder name"));
}

#[test]
fn permits_only_require_a_document_number() {
    let permit = LegalDocument {
        id: "doc-imb".to_string(),
        kind: LegalDocumentKind::BuildingPermit,
        number: None,
        holder_name: None,
        issued_on: None,
        due_date: None,
        reminder_date: None,
        verified: false,
    };

    let alerts = alerts_for(vec![permit]);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "doc-imb-missing-fields");
    assert!(alerts[0].message.contains("document number"));
}

#[test]
fn an_expired_document_can_also_be_missing_fields() {
    let mut document = certificate();
    document.number = None;
    document.holder_name = None;
    document.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);

    let alerts = alerts_for(vec![document]);

    let ids: Vec<&str> = alerts.iter().map(|alert| alert.id.as_str()).collect();
    assert_eq!(ids, vec!["doc-cert-missing-fields", "doc-cert-expired"]);
}

#[test]
fn supporting_documents_have_no_required_fields() {
    let other = LegalDocument {
        id: "doc-misc".to_string(),
        kind: LegalDocumentKind::Other,
        number: None,
        holder_name: None,
        issued_on: None,
        due_date: None,
        reminder_date: None,
        verified: true,
    };

    let alerts = alerts_for(vec![other]);

    assert!(alerts.is_empty());
}
