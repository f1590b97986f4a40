//! Recover a JSON object from free-form model output.

use super::shape::Shape;
use crate::error::Error;
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

static FENCED_JSON: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)```json\s*([\s\S]*?)\s*```").ok());

/// A JSON object that passed shape validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    value: Value,
}

impl ExtractedRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.value.as_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Deserialize into a typed record. A mismatch here means the shape was
    /// looser than `T`, and is reported as a malformed response.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.clone()).map_err(|e| Error::malformed(e.to_string()))
    }
}

/// Find the JSON object in `raw`.
///
/// Tried in order: the whole text, the first fenced block labelled `json`,
/// then the span from the first `{` to the last `}`. Only objects count.
pub fn locate_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    if let Some(v) = parse_object(trimmed) {
        return Some(v);
    }

    if let Some(re) = FENCED_JSON.as_ref() {
        if let Some(inner) = re.captures(raw).and_then(|c| c.get(1)) {
            if let Some(v) = parse_object(inner.as_str()) {
                return Some(v);
            }
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&raw[start..=end])
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// Locate, parse and validate a record of `shape` in `raw`.
///
/// The object comes back as parsed; the only change is `[]` filled in for
/// absent fields declared with [`Shape::optional_or_empty`].
pub fn extract(raw: &str, shape: &Shape) -> Result<ExtractedRecord> {
    let mut value = locate_json(raw).ok_or_else(|| {
        debug!(chars = raw.len(), "no JSON object found in model output");
        Error::malformed("no JSON object found in model output")
    })?;

    if let Some(object) = value.as_object_mut() {
        shape.validate(object, "")?;
    }
    Ok(ExtractedRecord { value })
}

/// [`extract`] followed by typed deserialization.
pub fn extract_as<T: DeserializeOwned>(raw: &str, shape: &Shape) -> Result<T> {
    extract(raw, shape)?.deserialize()
}
