use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::question::{self, NormalizePolicy, Question};

/// Everything from the first `{` to the last `}`.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON object regex"));

/// A form-shaped candidate parsed out of model output. Never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

impl FormDraft {
    /// The draft's questions as the untyped list the form repository accepts.
    pub fn questions_value(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(&self.questions)?)
    }
}

fn invalid(reason: impl std::fmt::Display) -> AppError {
    AppError::Generation(format!("Failed to generate valid form structure: {reason}"))
}

/// Parse free model text into a draft.
///
/// Questions are cleaned with the strict policy: a choice question that is
/// left with fewer than two real options fails the whole draft instead of
/// being padded.
pub fn import_draft(raw_model_text: &str) -> Result<FormDraft, AppError> {
    let candidate = JSON_OBJECT
        .find(raw_model_text)
        .ok_or_else(|| invalid("no JSON found in response"))?;

    let parsed: Value = serde_json::from_str(candidate.as_str()).map_err(invalid)?;

    let title = parsed
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| invalid("missing title"))?;
    let raw_questions = parsed
        .get("questions")
        .filter(|q| q.is_array())
        .ok_or_else(|| invalid("missing questions array"))?;
    let description = parsed
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();

    let questions = question::normalize_questions(raw_questions, NormalizePolicy::STRICT)
        .map_err(|e| match e {
            AppError::Schema(msg) => invalid(msg),
            other => other,
        })?;

    Ok(FormDraft {
        title: title.to_string(),
        description: description.to_string(),
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;

    const GOOD: &str = r#"Sure! Here is your form:
```json
{
  "title": " Event RSVP ",
  "description": "Let us know",
  "questions": [
    { "id": "q1", "type": "short", "question": "Full name", "required": true },
    { "type": "Multiple", "question": "Attending?", "options": ["Option 1: Yes", "Option 2: No"] }
  ]
}
```
Hope that helps."#;

    #[test]
    fn extracts_object_from_chatter() {
        let draft = import_draft(GOOD).expect("draft");
        assert_eq!(draft.title, "Event RSVP");
        assert_eq!(draft.description, "Let us know");
        assert_eq!(draft.questions.len(), 2);
        assert_eq!(draft.questions[0].text, "Full name");
        assert!(draft.questions[0].required);
        assert_eq!(draft.questions[1].id, "q2");
        assert_eq!(draft.questions[1].kind, QuestionType::Multiple);
        assert_eq!(draft.questions[1].options, vec!["Yes", "No"]);
    }

    #[test]
    fn text_without_json_fails() {
        let err = import_draft("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn broken_json_fails() {
        let err = import_draft("{ \"title\": \"x\", ").unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
        let err = import_draft("{ \"title\": \"x\", questions: [] }").unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn title_and_questions_are_required() {
        for text in [
            r#"{"questions": []}"#,
            r#"{"title": "", "questions": []}"#,
            r#"{"title": "T"}"#,
            r#"{"title": "T", "questions": "none"}"#,
        ] {
            let err = import_draft(text).unwrap_err();
            assert!(matches!(err, AppError::Generation(_)), "expected failure for {text}");
        }
    }

    #[test]
    fn placeholder_only_options_fail_instead_of_padding() {
        let text = r#"{"title": "T", "questions": [
            {"type": "dropdown", "question": "Pick", "options": ["Option 1", "Option 2"]}
        ]}"#;
        let err = import_draft(text).unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn drafts_survive_lenient_renormalization_unchanged() {
        let draft = import_draft(GOOD).expect("draft");
        let again = question::normalize_questions(
            &draft.questions_value().expect("value"),
            NormalizePolicy::LENIENT,
        )
        .expect("normalize");
        assert_eq!(draft.questions, again);
    }
}
