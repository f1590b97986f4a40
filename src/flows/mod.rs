//! Clinical drafting flows.
//!
//! Each flow builds a prompt, asks [`GenAi`] for a model, and either returns the
//! text or extracts a [`StructuredRecord`] through the shared extractor.

mod prompts;
pub mod records;

pub use records::{
    CodingSuggestions, Diagnosis, DifferentialDiagnosis, FollowUp, InsightsRequest, Invoice,
    InvoiceLine, InvoiceRequest, KeyAbnormality, NoteDraft, PotentialDiagnosis, ReceptionReply,
    ReportPeriod, StructuredRecord, SuggestedCode,
};

use crate::client::GenerationOptions;
use crate::error::Error;
use crate::facade::GenAi;
use crate::structured;
use crate::types::{Part, Turn};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Drives the drafting flows against one [`GenAi`].
#[derive(Clone)]
pub struct ClinicalAssistant {
    genai: Arc<GenAi>,
}

impl ClinicalAssistant {
    pub fn new(genai: Arc<GenAi>) -> Self {
        Self { genai }
    }

    pub fn genai(&self) -> &GenAi {
        &self.genai
    }

    async fn generate_text(&self, prompt: String, options: GenerationOptions) -> Result<String> {
        let model = self.genai.model(options).await?;
        info!(model = model.model_id(), "drafting");
        model.generate(prompt).await
    }

    async fn generate_record<T: StructuredRecord>(
        &self,
        flow: &'static str,
        prompt: String,
        options: GenerationOptions,
    ) -> Result<T> {
        let text = self.generate_text(prompt, options).await?;
        structured::extract_as(&text, &T::shape()).map_err(|e| {
            warn!(flow, error = %e, "model reply did not match the expected record");
            e
        })
    }

    /// ICD-10 / CPT suggestions for a visit.
    pub async fn suggest_codes(&self, visit_notes: &str) -> Result<CodingSuggestions> {
        self.generate_record(
            "coding",
            prompts::coding(visit_notes),
            GenerationOptions::new(),
        )
        .await
    }

    /// Structured diagnostic read of a health report.
    pub async fn diagnose_report(&self, report: &str) -> Result<Diagnosis> {
        let options = GenerationOptions::new()
            .with_temperature(0.2)
            .with_max_output_tokens(8192)
            .json();
        self.generate_record("diagnosis", prompts::diagnosis(report), options)
            .await
    }

    /// Follow-up question about a report, answered in a conversation seeded
    /// with the report, the initial diagnosis and the prior chat.
    pub async fn ask_diagnostic_question(
        &self,
        report: &str,
        question: &str,
        chat_history: &[Turn],
        diagnosis_context: Option<&str>,
    ) -> Result<String> {
        let model = self
            .genai
            .model(GenerationOptions::new().with_max_output_tokens(1000))
            .await?;

        let mut history = Vec::with_capacity(chat_history.len() + 2);
        history.push(Turn::user(prompts::diagnostic_context(report, diagnosis_context)));
        history.push(Turn::model(prompts::DIAGNOSTIC_ACKNOWLEDGEMENT));
        history.extend_from_slice(chat_history);

        let mut conversation = model.start_conversation(history);
        conversation.send(question).await
    }

    /// Markdown prescription and management plan.
    pub async fn draft_prescription(&self, diagnosis: &Value, patient_context: &str) -> Result<String> {
        self.generate_text(
            prompts::prescription(diagnosis, patient_context),
            GenerationOptions::new(),
        )
        .await
    }

    pub async fn draft_progress_note(&self, patient_data: &str) -> Result<NoteDraft> {
        self.generate_record(
            "progress_note",
            prompts::progress_note(patient_data),
            GenerationOptions::new(),
        )
        .await
    }

    pub async fn generate_invoice(&self, request: &InvoiceRequest) -> Result<Invoice> {
        self.generate_record("invoice", prompts::invoice(request), GenerationOptions::new())
            .await
    }

    /// Markdown practice report.
    pub async fn practice_insights(&self, request: &InsightsRequest) -> Result<String> {
        self.generate_text(prompts::practice_insights(request), GenerationOptions::new())
            .await
    }

    /// SOAP note from a consultation recording.
    ///
    /// `api_key`, when given, is used instead of the configured credential.
    pub async fn soap_note_from_audio(
        &self,
        audio: &[u8],
        mime_type: &str,
        api_key: Option<&str>,
    ) -> Result<String> {
        if audio.is_empty() {
            return Err(Error::generation_failed("no audio supplied"));
        }
        let mut options = GenerationOptions::new();
        if let Some(key) = api_key {
            options = options.with_api_key(key);
        }
        let model = self.genai.model(options).await?;
        let parts = vec![Part::text(prompts::SOAP_NOTE), Part::inline_bytes(mime_type, audio)];
        model.generate(parts).await
    }

    /// Reception desk reply.
    ///
    /// A reply carrying a JSON object with a string `response` is returned as
    /// that record (with any `updatedQueue`); anything else is plain text.
    pub async fn reception_reply(&self, query: &str, queue: &Value, tasks: &Value) -> Result<ReceptionReply> {
        let text = self
            .generate_text(prompts::reception(query, queue, tasks), GenerationOptions::new())
            .await?;
        Ok(parse_reception_reply(text))
    }
}

fn parse_reception_reply(text: String) -> ReceptionReply {
    match structured::extract_as::<ReceptionReply>(&text, &ReceptionReply::shape()) {
        Ok(reply) => reply,
        Err(_) => ReceptionReply {
            response: text,
            updated_queue: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reception_reply_from_fenced_json() {
        let text = "Done!\n```json\n{\"response\": \"Moved Ana to slot 2\", \"updatedQueue\": [\"Ben\", \"Ana\"]}\n```".to_string();
        let reply = parse_reception_reply(text);
        assert_eq!(reply.response, "Moved Ana to slot 2");
        assert_eq!(reply.updated_queue, Some(json!(["Ben", "Ana"])));
    }

    #[test]
    fn reception_reply_plain_text() {
        let text = "We open at 9am. {not json}".to_string();
        let reply = parse_reception_reply(text.clone());
        assert_eq!(reply.response, text);
        assert!(reply.updated_queue.is_none());
    }

    #[test]
    fn reception_reply_without_response_key_is_text() {
        let text = "{\"queue\": []}".to_string();
        assert_eq!(parse_reception_reply(text.clone()).response, text);
    }
}
