use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generator::FormDraft;
use crate::models::form::{Form, FormIds};
use crate::models::question::Question;
use crate::models::user::UserDisplay;

/// Register / login body.
#[derive(Deserialize, Debug)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Serialize, Debug)]
pub struct UserResponse {
    pub user: UserDisplay,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create / update body. `questions` stays untyped until the normalizer has run.
#[derive(Deserialize, Debug)]
pub struct FormRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Value,
}

#[derive(Serialize, Debug)]
pub struct FormIdsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub ids: FormIds,
}

#[derive(Deserialize, Debug)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub ids: FormIds,
    pub form: FormDraft,
}

/// Owner's form list entry.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FormListItem {
    #[serde(flatten)]
    pub form: Form,
    pub response_count: i64,
}

/// What anonymous share-link visitors get to see: no owner id.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicForm {
    pub id: String,
    pub share_id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub created_at: String,
}

impl From<Form> for PublicForm {
    fn from(f: Form) -> Self {
        PublicForm {
            id: f.id,
            share_id: f.share_id,
            title: f.title,
            description: f.description,
            questions: f.questions,
            created_at: f.created_at,
        }
    }
}

/// Public submission body. `responses` is the raw answer list.
#[derive(Deserialize, Debug)]
pub struct SubmitRequest {
    #[serde(default)]
    pub responses: Value,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub response_id: String,
}

#[derive(Serialize, Debug)]
pub struct CountResponse {
    pub count: i64,
}
