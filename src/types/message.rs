//! Request content: parts, turns and generation requests.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One content segment. Serializes to the provider's `parts` entry shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

/// Binary payload with its declared media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64 encoded.
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Already base64-encoded data.
    pub fn inline_base64(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    pub fn inline_bytes(mime_type: impl Into<String>, bytes: impl AsRef<[u8]>) -> Self {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes.as_ref());
        Self::inline_base64(mime_type, data)
    }

    /// Read a file and attach it with a media type guessed from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = guess_media_type(path).unwrap_or("application/octet-stream");
        Ok(Self::inline_bytes(media_type, bytes))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::InlineData { .. } => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Part::InlineData { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    pub fn with_parts(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Text parts joined with newlines; binary parts are skipped.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Single-shot input: a plain prompt or an ordered list of parts.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Text(String),
    Parts(Vec<Part>),
}

impl Prompt {
    pub fn into_parts(self) -> Vec<Part> {
        match self {
            Prompt::Text(text) => vec![Part::text(text)],
            Prompt::Parts(parts) => parts,
        }
    }
}

impl From<&str> for Prompt {
    fn from(s: &str) -> Self {
        Prompt::Text(s.to_string())
    }
}

impl From<String> for Prompt {
    fn from(s: String) -> Self {
        Prompt::Text(s)
    }
}

impl From<Vec<Part>> for Prompt {
    fn from(parts: Vec<Part>) -> Self {
        Prompt::Parts(parts)
    }
}

/// Everything a generation call can send.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Prompt(String),
    Parts(Vec<Part>),
    /// Prior turns followed by one new user message.
    Conversation { history: Vec<Turn>, message: String },
}

impl GenerationRequest {
    /// Provider `contents`: the ordered turns this request sends.
    pub fn into_turns(self) -> Vec<Turn> {
        match self {
            GenerationRequest::Prompt(text) => vec![Turn::user(text)],
            GenerationRequest::Parts(parts) => vec![Turn::with_parts(Role::User, parts)],
            GenerationRequest::Conversation { mut history, message } => {
                history.push(Turn::user(message));
                history
            }
        }
    }
}

impl From<Prompt> for GenerationRequest {
    fn from(prompt: Prompt) -> Self {
        match prompt {
            Prompt::Text(text) => GenerationRequest::Prompt(text),
            Prompt::Parts(parts) => GenerationRequest::Parts(parts),
        }
    }
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let mt = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        _ => return None,
    };
    Some(mt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parts_serialize_to_wire_shape() {
        let parts = vec![
            Part::text("Transcribe this"),
            Part::inline_bytes("audio/webm", b"abc"),
        ];
        let value = serde_json::to_value(&parts).unwrap();
        assert_eq!(
            value,
            json!([
                {"text": "Transcribe this"},
                {"inlineData": {"mimeType": "audio/webm", "data": "YWJj"}}
            ])
        );
    }

    #[test]
    fn turn_serializes_role_lowercase() {
        let value = serde_json::to_value(Turn::model("ready")).unwrap();
        assert_eq!(value, json!({"role": "model", "parts": [{"text": "ready"}]}));
    }

    #[test]
    fn conversation_request_appends_user_turn() {
        let request = GenerationRequest::Conversation {
            history: vec![Turn::user("context"), Turn::model("ok")],
            message: "question".into(),
        };
        let turns = request.into_turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2].role, Role::User);
        assert_eq!(turns[2].text(), "question");
    }

    #[test]
    fn media_type_guess() {
        assert_eq!(guess_media_type(Path::new("visit.WAV")), Some("audio/wav"));
        assert_eq!(guess_media_type(Path::new("notes.txt")), None);
    }
}
