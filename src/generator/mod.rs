//! Turning a short topic description into a form draft via a text-generation
//! service. Nothing here touches the database; callers persist the draft
//! through the form repository like any hand-built form.

pub mod client;
pub mod draft;
pub mod prompt;

pub use client::{GeminiClient, TextGenerator};
pub use draft::{FormDraft, import_draft};

use crate::errors::AppError;

/// Prompt the generator about `topic` and parse its reply into a draft.
pub async fn generate_draft<G: TextGenerator>(generator: &G, topic: &str) -> Result<FormDraft, AppError> {
    let prompt = prompt::build_prompt(topic);
    let raw = generator.generate(&prompt).await?;
    import_draft(&raw).inspect_err(|e| log::warn!("Unusable generation output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String, AppError> {
            assert!(prompt.contains("team offsite"));
            Ok(self.0.to_string())
        }
    }

    struct Down;

    impl TextGenerator for Down {
        async fn generate(&self, _prompt: &str) -> Result<String, AppError> {
            Err(AppError::Generation("generation timed out after 30s".to_string()))
        }
    }

    #[tokio::test]
    async fn canned_reply_becomes_a_draft() {
        let canned = Canned(r#"{"title":"Offsite","questions":[{"type":"short","question":"Name"}]}"#);
        let draft = generate_draft(&canned, "team offsite").await.expect("draft");
        assert_eq!(draft.title, "Offsite");
        assert_eq!(draft.questions[0].id, "q1");
    }

    #[tokio::test]
    async fn junk_reply_is_a_generation_error() {
        let canned = Canned("no idea, sorry");
        let err = generate_draft(&canned, "team offsite").await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let err = generate_draft(&Down, "anything").await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}
