use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Short,
    Paragraph,
    Multiple,
    Checkbox,
    Dropdown,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Short,
        QuestionType::Paragraph,
        QuestionType::Multiple,
        QuestionType::Checkbox,
        QuestionType::Dropdown,
    ];

    /// Case-insensitive, whitespace-tolerant lookup.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == wanted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Short => "short",
            QuestionType::Paragraph => "paragraph",
            QuestionType::Multiple => "multiple",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Dropdown => "dropdown",
        }
    }

    /// Choice-bearing types carry an option list.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            QuestionType::Multiple | QuestionType::Checkbox | QuestionType::Dropdown
        )
    }
}

/// One input field of a form, in canonical (normalized) shape.
///
/// Older rows stored the prompt under `question`; that name is still
/// accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(alias = "question")]
    pub text: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}
