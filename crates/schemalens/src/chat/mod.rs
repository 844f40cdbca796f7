//! Free-text questions answered from the most recent persisted report.

use serde::Serialize;
use serde_json::Value;

use crate::error::ChatError;
use crate::generation::{TextGenerator, complete_object};
use crate::plan::prompts;
use crate::store::ReportStore;

pub const REFUSAL_SENTENCE: &str =
    "Based on the latest insights, there is not enough data to answer this question.";
pub const NO_RESPONSE: &str = "No response generated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatAnswer {
    pub load_id: String,
    pub load_datetime: String,
    pub question: String,
    pub answer: String,
}

pub fn answer_question(
    generator: &dyn TextGenerator,
    store: &dyn ReportStore,
    question: &str,
) -> Result<ChatAnswer, ChatError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ChatError::MissingMessage);
    }

    let latest = store.latest()?.ok_or(ChatError::NoInsights)?;
    let response = complete_object(generator, "chat", &prompts::chat(question, &latest.data));
    let answer = match response.get("answer") {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Null) | Some(Value::String(_)) | None => NO_RESPONSE.to_string(),
        Some(other) => other.to_string(),
    };

    tracing::info!(load_id = %latest.load_id, "question answered");
    Ok(ChatAnswer {
        load_id: latest.load_id,
        load_datetime: latest.load_datetime,
        question: question.to_string(),
        answer,
    })
}
