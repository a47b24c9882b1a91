use crate::{
    ledger::{FeedbackStore, StoreError},
    validation::{escape_sql, sanitize_email, sanitize_name, validate_text},
    FeedbackRecord, ValidationError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors submitting a feedback form
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Feedback service
pub struct FeedbackService<S> {
    store: S,
}

impl<S: FeedbackStore> FeedbackService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store feedback and return the assigned record id
    ///
    /// Every field has its single quotes doubled before it reaches the store.
    /// No other checks happen here; see [`FeedbackService::submit_form`].
    pub async fn submit_feedback(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        comments: &str,
    ) -> Result<String, StoreError> {
        debug!("submit_feedback('{}', '{}', '{}')", name, email, subject);

        let record = FeedbackRecord {
            name: escape_sql(name),
            email: escape_sql(email),
            subject: escape_sql(subject),
            comments: escape_sql(comments),
        };

        let id = self.store.store_feedback(record).await?;
        info!("Stored feedback {}", id);
        Ok(id.to_string())
    }

    /// Validate a raw feedback form, then store it
    ///
    /// Name and email go through their whitelists, subject and comments
    /// through the free-text whitelist. The first invalid field stops the
    /// submission.
    pub async fn submit_form(&self, form: &FeedbackRecord) -> Result<String, FeedbackError> {
        let sanitized =
            sanitize_form(form).inspect_err(|e| warn!("Feedback form rejected: {}", e))?;

        let id = self
            .submit_feedback(
                &sanitized.name,
                &sanitized.email,
                &sanitized.subject,
                &sanitized.comments,
            )
            .await?;
        Ok(id)
    }
}

fn sanitize_form(form: &FeedbackRecord) -> Result<FeedbackRecord, ValidationError> {
    Ok(FeedbackRecord {
        name: sanitize_name(&form.name)?,
        email: sanitize_email(&form.email)?,
        subject: validate_text(&form.subject)?,
        comments: validate_text(&form.comments)?,
    })
}
