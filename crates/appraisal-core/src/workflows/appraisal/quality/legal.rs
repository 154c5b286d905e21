use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{LegalDocument, LegalDocumentKind};

/// User-facing notice produced by the legal document pass. Alerts are always
/// surfaced; they never block the review gate on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalAlert {
    pub id: String,
    pub label: String,
    pub message: String,
    pub document_id: String,
}

/// Evaluate every legal document against the given evaluation date.
///
/// A document yields an alert when it is missing fields required for its
/// kind, when its due date has passed, or when its reminder date has been
/// reached while the document is still in force.
pub(crate) fn evaluate_documents(documents: &[LegalDocument], today: NaiveDate) -> Vec<LegalAlert> {
    let mut alerts = Vec::new();

    for document in documents {
        let missing = missing_fields(document);
        if !missing.is_empty() {
            alerts.push(LegalAlert {
                id: format!("{}-missing-fields", document.id),
                label: document.kind.label().to_string(),
                message: format!(
                    "{} is missing required fields: {}",
                    document.kind.label(),
                    missing.join(", ")
                ),
                document_id: document.id.clone(),
            });
        }

        if let Some(due) = document.due_date.filter(|due| *due <= today) {
            alerts.push(LegalAlert {
                id: format!("{}-expired", document.id),
                label: document.kind.label().to_string(),
                message: format!(
                    "{} {} expired on {due}",
                    document.kind.label(),
                    document_reference(document)
                ),
                document_id: document.id.clone(),
            });
        } else if document
            .reminder_date
            .is_some_and(|reminder| reminder <= today)
        {
            alerts.push(LegalAlert {
                id: format!("{}-reminder", document.id),
                label: document.kind.label().to_string(),
                message: format!(
                    "{} {} is approaching its due date",
                    document.kind.label(),
                    document_reference(document)
                ),
                document_id: document.id.clone(),
            });
        }
    }

    alerts
}

fn document_reference(document: &LegalDocument) -> &str {
    document.number.as_deref().unwrap_or(document.id.as_str())
}

fn missing_fields(document: &LegalDocument) -> Vec<&'static str> {
    let mut missing = Vec::new();
    let number_missing = document
        .number
        .as_deref()
        .map_or(true, |number| number.trim().is_empty());

    match document.kind {
        LegalDocumentKind::OwnershipCertificate => {
            if number_missing {
                missing.push("certificate number");
            }
            if document
                .holder_name
                .as_deref()
                .map_or(true, |holder| holder.trim().is_empty())
            {
                missing.push("holder name");
            }
        }
        LegalDocumentKind::BuildingPermit | LegalDocumentKind::TaxReceipt => {
            if number_missing {
                missing.push("document number");
            }
        }
        LegalDocumentKind::Other => {}
    }

    missing
}
