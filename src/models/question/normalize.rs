use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::AppError;
use super::types::{Question, QuestionType};

/// Filler used when a choice question ends up with fewer than two options.
pub const PLACEHOLDER_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];

/// Minimum number of options a choice question must carry.
pub const MIN_OPTIONS: usize = 2;

/// Leftover "Option 3:" style prefixes from placeholder text.
static PLACEHOLDER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^option \d+:?\s*").expect("valid placeholder regex"));

/// How to treat a choice question that runs out of usable options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizePolicy {
    /// `true`: replace the options with [`PLACEHOLDER_OPTIONS`].
    /// `false`: reject the question.
    pub pad_with_placeholders: bool,
}

impl NormalizePolicy {
    /// Hand-built and stored forms: never fail over options.
    pub const LENIENT: NormalizePolicy = NormalizePolicy { pad_with_placeholders: true };
    /// Generated drafts: a choice question without real options is unusable.
    pub const STRICT: NormalizePolicy = NormalizePolicy { pad_with_placeholders: false };
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self::LENIENT
    }
}

/// Validate and canonicalize an untyped question list.
///
/// Output order matches input order, ids are unique within the list, and
/// running the result through again returns it unchanged.
pub fn normalize_questions(raw: &Value, policy: NormalizePolicy) -> Result<Vec<Question>, AppError> {
    let entries = raw
        .as_array()
        .ok_or_else(|| AppError::Schema("Questions must be an array".to_string()))?;

    let mut used_ids = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_one(index, entry, policy, &mut used_ids))
        .collect()
}

/// Re-run already-typed questions through the normalizer.
pub fn renormalize(questions: &[Question], policy: NormalizePolicy) -> Result<Vec<Question>, AppError> {
    let raw = serde_json::to_value(questions)?;
    normalize_questions(&raw, policy)
}

fn normalize_one(
    index: usize,
    entry: &Value,
    policy: NormalizePolicy,
    used_ids: &mut HashSet<String>,
) -> Result<Question, AppError> {
    let missing = || {
        AppError::Schema(format!("Invalid question at index {index}: missing required fields"))
    };

    let obj = entry.as_object().ok_or_else(missing)?;
    let raw_type = non_empty_str(obj, &["type"]).ok_or_else(missing)?;
    let text = non_empty_str(obj, &["text", "question"]).ok_or_else(missing)?;

    let kind = QuestionType::parse(raw_type).ok_or_else(|| {
        AppError::Schema(format!("Invalid question at index {index}: unknown type '{raw_type}'"))
    })?;

    let options = if kind.has_options() {
        let cleaned = clean_options(obj.get("options"));
        if cleaned.len() >= MIN_OPTIONS {
            cleaned
        } else if policy.pad_with_placeholders {
            PLACEHOLDER_OPTIONS.iter().map(|o| o.to_string()).collect()
        } else {
            return Err(AppError::Schema(format!(
                "Question {} must have at least {MIN_OPTIONS} valid options",
                index + 1
            )));
        }
    } else {
        Vec::new()
    };

    Ok(Question {
        id: assign_id(index, obj.get("id"), used_ids),
        kind,
        text: text.to_string(),
        required: is_truthy(obj.get("required")),
        options,
    })
}

/// First of `keys` holding a string that is non-empty after trimming.
fn non_empty_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

/// Keep a supplied id when present and unused; otherwise `q{n}` (1-based),
/// suffixed `_2`, `_3`, ... until unique.
fn assign_id(index: usize, raw: Option<&Value>, used_ids: &mut HashSet<String>) -> String {
    let supplied = match raw {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let base = format!("q{}", index + 1);
    let mut id = match supplied {
        Some(id) if !used_ids.contains(&id) => id,
        _ => base.clone(),
    };
    let mut suffix = 2;
    while used_ids.contains(&id) {
        id = format!("{base}_{suffix}");
        suffix += 1;
    }
    used_ids.insert(id.clone());
    id
}

/// Loose truthiness: booleans as-is, numbers when non-zero, strings when
/// non-empty, objects and arrays always, null/absent never.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Trim, strip placeholder prefixes, drop empties and duplicates (first one wins).
fn clean_options(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(option_text)
        .map(|text| strip_placeholder_prefix(&text))
        .filter(|text| !text.is_empty())
        .filter(|text| seen.insert(text.clone()))
        .collect()
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Strips repeatedly so "Option 1: Option 2: Red" settles on "Red" in one pass.
fn strip_placeholder_prefix(text: &str) -> String {
    let mut current = text.trim();
    while let Some(m) = PLACEHOLDER_PREFIX.find(current) {
        current = current[m.end()..].trim();
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lenient(raw: Value) -> Vec<Question> {
        normalize_questions(&raw, NormalizePolicy::LENIENT).expect("normalize")
    }

    #[test]
    fn rejects_non_array_input() {
        let err = normalize_questions(&json!({"type": "short"}), NormalizePolicy::LENIENT)
            .unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn rejects_missing_type_or_blank_text() {
        for raw in [
            json!([{ "text": "Name" }]),
            json!([{ "type": "short", "text": "   " }]),
            json!([{ "type": "short" }]),
            json!(["just a string"]),
        ] {
            let err = normalize_questions(&raw, NormalizePolicy::LENIENT).unwrap_err();
            assert!(matches!(err, AppError::Schema(_)), "expected schema error for {raw}");
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let err = normalize_questions(&json!([{ "type": "slider", "text": "How much?" }]), NormalizePolicy::LENIENT)
            .unwrap_err();
        match err {
            AppError::Schema(msg) => assert!(msg.contains("slider")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn canonicalizes_basic_fields() {
        let qs = lenient(json!([
            { "type": " SHORT ", "text": "  Name  ", "required": "yes" },
            { "id": "email", "type": "Paragraph", "question": "About you", "required": 0 }
        ]));
        assert_eq!(qs[0].id, "q1");
        assert_eq!(qs[0].kind, QuestionType::Short);
        assert_eq!(qs[0].text, "Name");
        assert!(qs[0].required);
        assert_eq!(qs[1].id, "email");
        assert_eq!(qs[1].kind, QuestionType::Paragraph);
        assert_eq!(qs[1].text, "About you");
        assert!(!qs[1].required);
    }

    #[test]
    fn non_choice_questions_drop_options() {
        let qs = lenient(json!([
            { "type": "short", "text": "Name", "options": ["a", "b", "c"] },
            { "type": "paragraph", "text": "Bio", "options": "nonsense" }
        ]));
        assert!(qs.iter().all(|q| q.options.is_empty()));
    }

    #[test]
    fn choice_options_are_cleaned_in_order() {
        let qs = lenient(json!([{
            "type": "dropdown",
            "text": "Colour",
            "options": ["  Red ", "", "Option 2: Blue", "Red", null, "option 3 Green", "Blue"]
        }]));
        assert_eq!(qs[0].options, vec!["Red", "Blue", "Green"]);
    }

    #[test]
    fn short_option_lists_are_padded() {
        for options in [json!(null), json!([]), json!(["Only"]), json!(["", "  "]), json!(["Option 1", "Option 2"])] {
            let qs = lenient(json!([{ "type": "checkbox", "text": "Pick", "options": options }]));
            assert_eq!(qs[0].options, vec!["Option 1", "Option 2"]);
        }
        let qs = lenient(json!([{ "type": "multiple", "text": "Pick" }]));
        assert_eq!(qs[0].options, vec!["Option 1", "Option 2"]);
    }

    #[test]
    fn strict_policy_refuses_to_pad() {
        let err = normalize_questions(
            &json!([{ "type": "multiple", "text": "Pick", "options": ["Yes", "Option 2:"] }]),
            NormalizePolicy::STRICT,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));

        let ok = normalize_questions(
            &json!([{ "type": "multiple", "text": "Pick", "options": ["Yes", "No"] }]),
            NormalizePolicy::STRICT,
        )
        .expect("two real options are enough");
        assert_eq!(ok[0].options, vec!["Yes", "No"]);
    }

    #[test]
    fn duplicate_ids_are_made_unique() {
        let qs = lenient(json!([
            { "id": "q2", "type": "short", "text": "A" },
            { "type": "short", "text": "B" },
            { "id": "q2", "type": "short", "text": "C" },
            { "id": "", "type": "short", "text": "D" }
        ]));
        let ids: Vec<&str> = qs.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q2", "q2_2", "q3", "q4"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            json!([
                { "type": "short", "text": " Name ", "required": true },
                { "id": "q1", "type": "checkbox", "text": "Colours", "options": ["Option 1: Red", "Blue", "Blue"] },
                { "type": "dropdown", "text": "Size", "options": ["Option 1: Option 2: Big"] },
                { "id": "x", "type": "MULTIPLE", "text": "Ok?", "options": ["yes", 2, true] }
            ]),
            json!([]),
        ];
        for raw in inputs {
            let once = lenient(raw);
            let twice = renormalize(&once, NormalizePolicy::LENIENT).expect("renormalize");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn strip_handles_nested_prefixes() {
        assert_eq!(strip_placeholder_prefix("Option 1: Option 2: Red"), "Red");
        assert_eq!(strip_placeholder_prefix("Optional extras"), "Optional extras");
        assert_eq!(strip_placeholder_prefix("Option 4"), "");
    }
}
