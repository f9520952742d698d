use serde::Serialize;

use crate::models::question::Question;

/// A named, owned collection of questions plus its two access identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub owner_id: String,
    pub share_id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub created_at: String,
}

/// Identifiers handed back by create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormIds {
    pub form_id: String,
    pub share_id: String,
}
