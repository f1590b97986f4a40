//! Request/response shapes for the two generation methods.
//!
//! `generateContent`:
//! - Body `{contents: [{role, parts}], generationConfig}`.
//! - Reply text is the concatenation of `candidates[0].content.parts[*].text`.
//!
//! `generateMessage` (legacy chat surface):
//! - Body `{prompt: {messages: [{author, content}]}, temperature, candidateCount}`.
//! - Reply text is `candidates[0].content`. Text only.
//! - Only `temperature` carries over; `maxOutputTokens` and
//!   `responseMimeType` have no equivalent and are dropped.

use super::options::GenerationConfig;
use crate::catalog::GenerationMethod;
use crate::error::Error;
use crate::types::{GenerationRequest, Part, Role};
use crate::Result;
use serde_json::{json, Value};
use tracing::debug;

pub(crate) fn build_body(
    method: GenerationMethod,
    request: GenerationRequest,
    config: &GenerationConfig,
) -> Result<Value> {
    match method {
        GenerationMethod::GenerateContent => build_content_body(request, config),
        GenerationMethod::GenerateMessage => build_message_body(request, config),
    }
}

pub(crate) fn parse_reply(method: GenerationMethod, body: &Value) -> Result<String> {
    match method {
        GenerationMethod::GenerateContent => parse_content_reply(body),
        GenerationMethod::GenerateMessage => parse_message_reply(body),
    }
}

fn build_content_body(request: GenerationRequest, config: &GenerationConfig) -> Result<Value> {
    let contents = request.into_turns();
    let mut body = json!({ "contents": contents });
    if !config.is_empty() {
        body["generationConfig"] = serde_json::to_value(config)?;
    }
    Ok(body)
}

fn build_message_body(request: GenerationRequest, config: &GenerationConfig) -> Result<Value> {
    let mut messages = Vec::new();
    for turn in request.into_turns() {
        if turn.parts.iter().any(Part::is_binary) {
            return Err(Error::generation_failed(
                "generateMessage endpoints accept text only; binary parts are not supported",
            ));
        }
        let author = match turn.role {
            Role::User => "0",
            Role::Model => "1",
        };
        messages.push(json!({ "author": author, "content": turn.text() }));
    }

    let mut body = json!({
        "prompt": { "messages": messages },
        "candidateCount": 1,
    });
    if let Some(t) = config.temperature {
        body["temperature"] = json!(t);
    }
    if config.max_output_tokens.is_some() || config.response_mime_type.is_some() {
        debug!(
            max_output_tokens = ?config.max_output_tokens,
            response_mime_type = ?config.response_mime_type,
            "generateMessage ignores output limits and mime type"
        );
    }
    Ok(body)
}

fn parse_content_reply(body: &Value) -> Result<String> {
    let candidate = body.pointer("/candidates/0");
    let Some(candidate) = candidate else {
        if let Some(reason) = body
            .pointer("/promptFeedback/blockReason")
            .and_then(|r| r.as_str())
        {
            return Err(Error::generation_failed(format!("prompt blocked: {}", reason)));
        }
        return Err(Error::generation_failed("reply contained no candidates"));
    };

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) =
            candidate.get("finishReason").and_then(|r| r.as_str())
        {
            return Err(Error::generation_failed(format!("response blocked: {}", reason)));
        }
    }
    Ok(text)
}

fn parse_message_reply(body: &Value) -> Result<String> {
    if let Some(content) = body
        .pointer("/candidates/0/content")
        .and_then(|c| c.as_str())
    {
        return Ok(content.to_string());
    }
    match body.pointer("/filters/0/reason").and_then(|r| r.as_str()) {
        Some(reason) => Err(Error::generation_failed(format!("response filtered: {}", reason))),
        None => Err(Error::generation_failed("reply contained no candidates")),
    }
}
