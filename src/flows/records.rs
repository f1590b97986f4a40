//! Typed records returned by the drafting flows, each with its declared shape.

use crate::structured::{FieldKind, Shape};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A record a flow extracts from model output.
pub trait StructuredRecord: DeserializeOwned {
    fn shape() -> Shape;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedCode {
    pub code: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingSuggestions {
    pub suggested_codes: Vec<SuggestedCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_history: Option<String>,
}

impl StructuredRecord for CodingSuggestions {
    fn shape() -> Shape {
        let code = Shape::new()
            .required("code", FieldKind::NonEmptyString)
            .required("confidenceScore", FieldKind::confidence());
        Shape::new()
            .required("suggestedCodes", FieldKind::ArrayOf(code))
            .optional("changeHistory", FieldKind::String)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAbnormality {
    pub parameter: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub normal_range: Option<String>,
    #[serde(default)]
    pub interpretation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialDiagnosis {
    pub diagnosis: String,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentialDiagnosis {
    pub diagnosis: String,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub recommendation: String,
    /// "High", "Medium" or "Low" as the model wrote it.
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub summary: String,
    pub potential_diagnoses: Vec<PotentialDiagnosis>,
    #[serde(default)]
    pub key_abnormalities: Vec<KeyAbnormality>,
    #[serde(default)]
    pub differential_diagnosis: Vec<DifferentialDiagnosis>,
    #[serde(default)]
    pub recommended_follow_ups: Vec<FollowUp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathophysiology_insights: Option<String>,
}

impl StructuredRecord for Diagnosis {
    fn shape() -> Shape {
        let potential = Shape::new()
            .required("diagnosis", FieldKind::NonEmptyString)
            .optional("confidenceScore", FieldKind::confidence())
            .optional("reasoning", FieldKind::String);
        let abnormality = Shape::new()
            .required("parameter", FieldKind::String)
            .optional("value", FieldKind::String)
            .optional("normalRange", FieldKind::String)
            .optional("interpretation", FieldKind::String);
        let differential = Shape::new()
            .required("diagnosis", FieldKind::String)
            .optional("reasoning", FieldKind::String);
        let follow_up = Shape::new()
            .required("recommendation", FieldKind::String)
            .optional("priority", FieldKind::String);

        Shape::new()
            .required("summary", FieldKind::String)
            .required("potentialDiagnoses", FieldKind::ArrayOf(potential))
            .optional_or_empty("keyAbnormalities", FieldKind::ArrayOf(abnormality))
            .optional_or_empty("differentialDiagnosis", FieldKind::ArrayOf(differential))
            .optional_or_empty("recommendedFollowUps", FieldKind::ArrayOf(follow_up))
            .optional("pathophysiologyInsights", FieldKind::String)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub assessment_suggestion: String,
    pub plan_suggestion: String,
}

impl StructuredRecord for NoteDraft {
    fn shape() -> Shape {
        Shape::new()
            .required("assessmentSuggestion", FieldKind::NonEmptyString)
            .required("planSuggestion", FieldKind::NonEmptyString)
    }
}

/// Consultation details an invoice is drafted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub consultation_notes: String,
    pub patient_name: String,
    pub patient_id: String,
    pub date_of_service: String,
    pub clinic_name: String,
    pub provider_name: String,
    /// Date the invoice is issued (YYYY-MM-DD); payment is due 30 days later.
    pub issued_on: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub description: String,
    pub code: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub services: Vec<InvoiceLine>,
    pub total_amount: f64,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub date_of_service: Option<String>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub payment_due_date: Option<String>,
}

impl StructuredRecord for Invoice {
    fn shape() -> Shape {
        let line = Shape::new()
            .required("description", FieldKind::String)
            .required("code", FieldKind::String)
            .required("price", FieldKind::non_negative());
        let mut shape = Shape::new()
            .required("invoiceNumber", FieldKind::NonEmptyString)
            .required("services", FieldKind::ArrayOf(line))
            .required("totalAmount", FieldKind::non_negative());
        for header in [
            "invoiceDate",
            "patientName",
            "patientId",
            "dateOfService",
            "clinicName",
            "providerName",
            "paymentDueDate",
        ] {
            shape = shape.optional(header, FieldKind::String);
        }
        shape
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Weekly,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data a practice insights report is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    pub period: ReportPeriod,
    pub clinic_name: String,
    /// Patient documents as stored (consultation fee, status, visit type, ...).
    pub patients: Vec<Value>,
    /// Staff task documents (status, assignee, due date, ...).
    pub tasks: Vec<Value>,
    /// Reference date for overdue checks, ISO 8601.
    pub current_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_queue: Option<Value>,
}

impl StructuredRecord for ReceptionReply {
    fn shape() -> Shape {
        Shape::new()
            .required("response", FieldKind::String)
            .optional("updatedQueue", FieldKind::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::extract_as;

    #[test]
    fn diagnosis_defaults_missing_arrays() {
        let raw = r#"{"summary": "Thyrotoxicosis", "potentialDiagnoses": [{"diagnosis": "Graves' disease", "confidenceScore": 0.9}]}"#;
        let d: Diagnosis = extract_as(raw, &Diagnosis::shape()).unwrap();
        assert!(d.key_abnormalities.is_empty());
        assert!(d.recommended_follow_ups.is_empty());
        assert_eq!(d.potential_diagnoses[0].confidence_score, Some(0.9));
    }

    #[test]
    fn invoice_rejects_negative_price() {
        let raw = r#"{"invoiceNumber": "INV-1", "totalAmount": 10, "services": [{"description": "Visit", "code": "99213", "price": -10}]}"#;
        let err = extract_as::<Invoice>(raw, &Invoice::shape()).unwrap_err();
        assert_eq!(err.field(), Some("services[0].price"));
    }

    #[test]
    fn note_draft_requires_both_sections() {
        let raw = r#"{"assessmentSuggestion": "Stable hypertension"}"#;
        let err = extract_as::<NoteDraft>(raw, &NoteDraft::shape()).unwrap_err();
        assert_eq!(err.field(), Some("planSuggestion"));
    }

    #[test]
    fn period_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ReportPeriod::Weekly).unwrap(), "weekly");
        assert_eq!(ReportPeriod::Daily.to_string(), "daily");
    }
}
