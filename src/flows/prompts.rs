//! Prompt templates for the drafting flows.

use super::records::{InsightsRequest, InvoiceRequest};
use serde_json::Value;

pub(crate) fn coding(visit_notes: &str) -> String {
    format!(
        "You are a medical coding assistant. Suggest ICD-10 and CPT codes that fit \
the visit notes below, each with a confidence score.

Visit notes:
{visit_notes}

Reply with a JSON object whose \"suggestedCodes\" key holds an array of objects \
with \"code\" (string) and \"confidenceScore\" (a number from 0 to 1). \
Example: {{\"suggestedCodes\": [{{\"code\": \"I10\", \"confidenceScore\": 0.95}}]}}"
    )
}

pub(crate) fn diagnosis(report: &str) -> String {
    format!(
        "You are an expert diagnostician. Work through the health report below: \
identify the organ systems involved, look for findings that do not fit the obvious \
pattern, and keep re-ranking your hypotheses until one explanation accounts for \
every finding.

Return a single JSON object with these keys:
- \"summary\": string. Short clinical summary with the leading diagnosis.
- \"keyAbnormalities\": array of {{\"parameter\", \"value\", \"normalRange\", \"interpretation\"}}, all strings. Use [] if there are none.
- \"potentialDiagnoses\": array of {{\"diagnosis\": string, \"confidenceScore\": number 0.0-1.0, \"reasoning\": string}}, most likely first. Scores must be numbers, not strings.
- \"differentialDiagnosis\": array of {{\"diagnosis\", \"reasoning\"}} for alternatives considered and why they are less likely.
- \"pathophysiologyInsights\": string. The mechanism linking the findings to the leading diagnosis.
- \"recommendedFollowUps\": array of {{\"recommendation\": string, \"priority\": \"High\" | \"Medium\" | \"Low\"}}.

Health report:
{report}

Return only the JSON object, with no surrounding text or markdown."
    )
}

pub(crate) fn diagnostic_context(report: &str, diagnosis_context: Option<&str>) -> String {
    format!(
        "You are a clinical assistant. Answer follow-up questions briefly and only \
from the health report and initial diagnosis below.

## Health report
{report}

## Initial diagnosis
{}
---",
        diagnosis_context.unwrap_or("N/A")
    )
}

pub(crate) const DIAGNOSTIC_ACKNOWLEDGEMENT: &str =
    "I have reviewed the report and the initial diagnosis and am ready for your questions about this case.";

pub(crate) fn prescription(diagnosis: &Value, patient_context: &str) -> String {
    let diagnosis = serde_json::to_string_pretty(diagnosis).unwrap_or_else(|_| diagnosis.to_string());
    format!(
        "You are a clinical pharmacologist drafting an initial management plan for a \
supervising physician. Start from the disease mechanism, pick therapeutic targets, \
and weigh efficacy, pharmacokinetics, adverse effects, contraindications, \
interactions and cost for each candidate drug before choosing.

Diagnosis:
{diagnosis}

Patient context:
{patient_context}

Write the plan in markdown with these sections:
### Prescription & Management Plan (Initial)
_Physician-supervised use only._
#### 1. Primary therapy: medication and dose, regimen, and a one-line rationale.
#### 2. Prophylaxis / secondary treatment: conditional therapies with rationale.
#### 3. Supportive care: supplements, lifestyle, hydration.
#### 4. Monitoring & follow-up: what to check and when.
#### Prognosis & impression.

Return only the markdown."
    )
}

pub(crate) fn progress_note(patient_data: &str) -> String {
    format!(
        "You help doctors draft progress notes. From the patient data below, suggest \
the assessment and the plan sections.

Patient data:
{patient_data}

Reply in JSON with the keys \"assessmentSuggestion\" and \"planSuggestion\"."
    )
}

pub(crate) fn invoice(request: &InvoiceRequest) -> String {
    format!(
        "You draft clinic invoices from consultation notes. List the services provided \
with CPT codes and realistic prices. Copy every input field into the invoice. The \
invoice date is {issued}; payment is due 30 days after it. Generate a unique \
invoice number.

Consultation notes: {notes}
Patient name: {patient_name}
Patient ID: {patient_id}
Date of service: {date_of_service}
Clinic name: {clinic_name}
Provider name: {provider_name}

Reply with a JSON object with the keys invoiceNumber, invoiceDate, patientName, \
patientId, dateOfService, clinicName, providerName, services (array of objects with \
description, code and price), totalAmount and paymentDueDate. Codes are strings; \
prices and totalAmount are numbers.",
        issued = request.issued_on,
        notes = request.consultation_notes,
        patient_name = request.patient_name,
        patient_id = request.patient_id,
        date_of_service = request.date_of_service,
        clinic_name = request.clinic_name,
        provider_name = request.provider_name,
    )
}

pub(crate) fn practice_insights(request: &InsightsRequest) -> String {
    let patients = serde_json::to_string_pretty(&request.patients).unwrap_or_default();
    let tasks = serde_json::to_string_pretty(&request.tasks).unwrap_or_default();
    let period = request.period;
    format!(
        "You are a data analyst for a medical clinic. Produce a {period} practice \
insights report from the data below.

Clinic: {clinic}
Current date: {today}
Patients:
{patients}
Tasks:
{tasks}

Write markdown with these sections:
1. Executive summary for the {period} period.
2. Patients and revenue: total revenue (sum of consultationFee), new patients \
(status New), OPD versus Emergency visit counts, and the visit types bringing in the most revenue.
3. Tasks and staff: completed versus pending tasks, overdue tasks (dueDate before the \
current date), and the assignees with the most open tasks.
4. Two or three specific, actionable recommendations.

Keep it concise and grounded in the numbers.",
        clinic = request.clinic_name,
        today = request.current_date,
    )
}

pub(crate) const SOAP_NOTE: &str = "You are a medical scribe. Listen to the attached \
doctor-patient consultation and write a concise SOAP note in markdown:

### S (Subjective)
Chief complaint and history of present illness.

### O (Objective)
Observations from the conversation.

### A (Assessment)
Primary and differential diagnoses.

### P (Plan)
Tests, treatments and follow-up.

Consultation audio:";

pub(crate) fn reception(query: &str, queue: &Value, tasks: &Value) -> String {
    let queue = serde_json::to_string_pretty(queue).unwrap_or_default();
    let tasks = serde_json::to_string_pretty(tasks).unwrap_or_default();
    format!(
        "You are the reception assistant of a medical clinic. You book appointments, \
answer questions and manage the patient queue. Be friendly and conversational.

Current patient queue:
{queue}
Current tasks:
{tasks}

Visitor query: \"{query}\"

Answer general questions directly. If the query changes the patient queue, reply \
with a JSON object {{\"response\": \"<your reply>\", \"updatedQueue\": <the new queue>}}."
    )
}
