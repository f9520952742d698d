use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::question::Question;

/// A single answer value: free text, or the ticked options of a checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Many(Vec<String>),
}

impl Default for AnswerValue {
    fn default() -> Self {
        AnswerValue::Text(String::new())
    }
}

impl AnswerValue {
    /// Nothing was actually answered.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::Many(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// Flat text for tabular export; multiple selections are joined with `;`.
    pub fn to_cell(&self) -> String {
        match self {
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Many(items) => items.join(";"),
        }
    }
}

impl From<Value> for AnswerValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AnswerValue::default(),
            Value::String(s) => AnswerValue::Text(s),
            Value::Array(items) => AnswerValue::Many(items.into_iter().map(scalar_text).collect()),
            other => AnswerValue::Text(scalar_text(other)),
        }
    }
}

// Submissions are stored verbatim, so numbers and booleans must still read back.
impl<'de> Deserialize<'de> for AnswerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(AnswerValue::from)
    }
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// One answered question inside a response.
///
/// Older clients sent `question` / `response` instead of
/// `questionText` / `value` and no `questionId`; both shapes read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, alias = "question")]
    pub question_text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, alias = "response")]
    pub value: AnswerValue,
}

/// One submission against a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: String,
    pub form_id: String,
    pub answers: Vec<Answer>,
    pub created_at: String,
}

/// The answer belonging to `question`.
///
/// Matches on `questionId`. Answers that carry no id at all fall back to
/// matching on the question text, which is all older submissions have.
pub fn answer_for<'a>(question: &Question, answers: &'a [Answer]) -> Option<&'a Answer> {
    answers
        .iter()
        .find(|a| a.question_id.as_deref() == Some(question.id.as_str()))
        .or_else(|| {
            answers
                .iter()
                .find(|a| a.question_id.is_none() && a.question_text == question.text)
        })
}

/// Required questions with no non-blank answer.
pub fn missing_required<'a>(questions: &'a [Question], answers: &[Answer]) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| q.required)
        .filter(|q| answer_for(q, answers).is_none_or(|a| a.value.is_blank()))
        .collect()
}
