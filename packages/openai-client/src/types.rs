//! Wire types for `POST /chat/completions` with a strict JSON schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OpenAIError, Result};

/// Schema name used when the caller does not supply one.
const DEFAULT_SCHEMA_NAME: &str = "structured_response";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A completion request whose answer must validate against `schema`.
///
/// Temperature is pinned to zero: the same posting should classify the same
/// way on every run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

impl ExtractionRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>, schema: Value) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::new(Role::System, system), Message::new(Role::User, user)],
            temperature: 0.0,
            response_format: ResponseFormat::strict(DEFAULT_SCHEMA_NAME, schema),
        }
    }

    /// Name reported to the API for the schema. Must match `[a-zA-Z0-9_-]+`.
    pub fn with_schema_name(mut self, name: impl AsRef<str>) -> Self {
        let sanitized: String = name
            .as_ref()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        if !sanitized.is_empty() {
            self.response_format.json_schema.name = sanitized;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: NamedSchema,
}

impl ResponseFormat {
    fn strict(name: &str, schema: Value) -> Self {
        Self {
            kind: "json_schema",
            json_schema: NamedSchema {
                name: name.to_string(),
                strict: true,
                schema,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedSchema {
    pub name: String,
    pub strict: bool,
    pub schema: Value,
}

/// Token counts as billed by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A deserialized answer together with the tokens it cost.
#[derive(Debug, Clone)]
pub struct Extracted<T> {
    pub value: T,
    pub usage: Option<Usage>,
}

/// Response body, reduced to the fields an extraction needs.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionBody {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl CompletionBody {
    /// Text of the first choice plus usage. Refusals and empty answers are errors.
    pub(crate) fn into_answer(self) -> Result<(String, Option<Usage>)> {
        let message = self
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(OpenAIError::EmptyAnswer)?;

        if let Some(reason) = message.refusal {
            return Err(OpenAIError::Refused(reason));
        }

        match message.content {
            Some(content) if !content.trim().is_empty() => Ok((content, self.usage)),
            _ => Err(OpenAIError::EmptyAnswer),
        }
    }
}

/// Cut `s` to at most `max_bytes` bytes without splitting a character.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Drop a markdown fence around a JSON answer, if the model added one.
pub fn strip_code_blocks(answer: &str) -> &str {
    answer
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_is_strict_json_schema() {
        let req = ExtractionRequest::new("gpt-4o-mini", "sys", "posting", json!({"type": "object"}))
            .with_schema_name("JobPostingExtraction");
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "posting"}));
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "JobPostingExtraction");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn schema_name_is_sanitized() {
        let req = ExtractionRequest::new("m", "s", "u", json!({}));
        assert_eq!(req.response_format.json_schema.name, "structured_response");

        let req = req.with_schema_name("Array_of<Job>");
        assert_eq!(req.response_format.json_schema.name, "Array_of_Job_");
    }

    #[test]
    fn answer_carries_content_and_usage() {
        let body: CompletionBody = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "{\"a\":1}" } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        }))
        .unwrap();

        let (content, usage) = body.into_answer().unwrap();
        assert_eq!(content, "{\"a\":1}");
        assert_eq!(usage.map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn refusal_and_empty_answers_are_errors() {
        let refused: CompletionBody = serde_json::from_value(json!({
            "choices": [{ "message": { "content": null, "refusal": "no" } }]
        }))
        .unwrap();
        assert!(matches!(refused.into_answer(), Err(OpenAIError::Refused(r)) if r == "no"));

        let blank: CompletionBody = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "  " } }]
        }))
        .unwrap();
        assert!(matches!(blank.into_answer(), Err(OpenAIError::EmptyAnswer)));

        let none: CompletionBody = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(none.into_answer(), Err(OpenAIError::EmptyAnswer)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "Développeur 世界";
        let truncated = truncate_to_char_boundary(text, 14);
        assert!(truncated.len() <= 14);
        assert!(text.starts_with(truncated));
        assert_eq!(truncate_to_char_boundary("short", 100), "short");
    }

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks(" {} "), "{}");
    }
}
