use super::model::GenerativeModel;
use crate::types::{GenerationRequest, Turn};
use crate::Result;

/// Multi-turn exchange against one model.
///
/// The history only grows when a turn succeeds: a failed `send` leaves it as
/// it was, so the caller can retry the same message.
#[derive(Debug, Clone)]
pub struct Conversation {
    model: GenerativeModel,
    history: Vec<Turn>,
}

impl Conversation {
    pub fn new(model: GenerativeModel, history: Vec<Turn>) -> Self {
        Self { model, history }
    }

    pub async fn send(&mut self, message: impl Into<String>) -> Result<String> {
        let message = message.into();
        let request = GenerationRequest::Conversation {
            history: self.history.clone(),
            message: message.clone(),
        };
        let reply = self.model.execute(request).await?;
        self.history.push(Turn::user(message));
        self.history.push(Turn::model(reply.clone()));
        Ok(reply)
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Turn> {
        self.history
    }

    pub fn model(&self) -> &GenerativeModel {
        &self.model
    }
}
