//! Payment-proof submission, the step after a student signup.

use serde::Serialize;
use time::OffsetDateTime;

use crate::api::validation::validate_image_upload;
use crate::api::{ApiError, Attachment, PaymentSubmission};
use crate::core::config::Settings;
use crate::core::state::ClientState;
use crate::core::time::{format_offset, now_utc, unix_millis};
use crate::dashboard::{expire, Outcome};
use crate::schemas::{PaymentDraft, PaymentRecord, PaymentStatus, Role};
use crate::session::StorageKey;
use crate::workflow::navigation::{Redirect, Route};

/// Mobile-money transfer details shown before the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstructions {
    pub number: String,
    pub name: String,
    pub reference: String,
}

impl PaymentInstructions {
    pub fn from_settings(settings: &Settings) -> Self {
        let payment = settings.payment();
        Self {
            number: payment.momo_number.clone(),
            name: payment.momo_name.clone(),
            reference: "Student's Full Name".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub payment: PaymentRecord,
    pub redirect: Redirect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentFlow {
    draft: PaymentDraft,
}

impl PaymentFlow {
    pub fn from_draft(draft: PaymentDraft) -> Self {
        Self { draft }
    }

    pub async fn load(client: &ClientState) -> Result<Self, ApiError> {
        client
            .store()
            .payment_draft()
            .await
            .map(Self::from_draft)
            .ok_or_else(|| ApiError::validation("No pending payment found. Please sign up first."))
    }

    pub fn draft(&self) -> &PaymentDraft {
        &self.draft
    }

    pub fn submission_at(&self, at: OffsetDateTime) -> PaymentSubmission {
        let full_name = self.draft.user.full_name.trim().to_string();
        PaymentSubmission {
            student_id: self.draft.user.id.clone(),
            reference_name: format!("{full_name}-{}", unix_millis(at)),
            student_name: full_name,
            curriculum: self.draft.curriculum.clone(),
            package: self.draft.package.clone(),
            grade: self.draft.grade.clone(),
            subjects: self.draft.subject_names(),
            amount: self.draft.total_amount,
            duration: self.draft.duration.clone(),
            transaction_date: format_offset(at),
        }
    }

    /// The record as it will look once submitted, before the server assigns a status.
    pub fn preview(&self, screenshot: &Attachment, at: OffsetDateTime) -> PaymentRecord {
        let submission = self.submission_at(at);
        PaymentRecord {
            student_id: submission.student_id,
            amount: submission.amount,
            package: submission.package,
            subjects: submission.subjects,
            screenshot_ref: screenshot.digest(),
            transaction_date: submission.transaction_date,
            status: PaymentStatus::Pending,
            duration: Some(submission.duration).filter(|duration| !duration.is_empty()),
            extra: Default::default(),
        }
    }

    /// Local precondition: a non-empty image of an allowed type within the size limit.
    pub fn check_attachment(settings: &Settings, screenshot: &Attachment) -> Result<(), ApiError> {
        let payment = settings.payment();
        validate_image_upload(
            &screenshot.file_name,
            &screenshot.content_type,
            screenshot.size(),
            &payment.allowed_image_extensions,
            payment.max_upload_bytes(),
        )
    }

    /// Uploads the proof. On success the payment and signup drafts are cleared; on failure
    /// both are kept for a user-initiated retry. A rejected session token signs the student
    /// out and redirects to login, still keeping both drafts.
    pub async fn submit(
        &self,
        client: &ClientState,
        screenshot: Option<Attachment>,
    ) -> Result<Outcome<PaymentOutcome>, ApiError> {
        let screenshot = screenshot
            .ok_or_else(|| ApiError::validation("Please upload your payment screenshot first."))?;
        Self::check_attachment(client.settings(), &screenshot)?;
        if self.draft.user.id.trim().is_empty() {
            return Err(ApiError::validation("Payment details are missing the student id"));
        }

        let at = now_utc();
        let submission = self.submission_at(at);
        let preview = self.preview(&screenshot, at);
        let session = client.store().session().await;
        let token = session.as_ref().map(|session| session.token.as_str());

        let returned = match client.api().submit_payment(&submission, screenshot, token).await {
            Ok(returned) => returned,
            Err(err) if err.is_auth_failure() => {
                metrics::counter!("payment_submissions_total", "outcome" => "rejected").increment(1);
                return Ok(Outcome::Redirect(expire(client, Role::Student).await?));
            }
            Err(err) => {
                metrics::counter!("payment_submissions_total", "outcome" => "failure").increment(1);
                tracing::warn!(error = %err, student_id = %submission.student_id, "Payment submission failed");
                return Err(err);
            }
        };
        metrics::counter!("payment_submissions_total", "outcome" => "success").increment(1);

        let payment = returned.unwrap_or(preview);
        let store = client.store();
        store.set_json(StorageKey::LastPayment, &payment).await?;
        store.clear(&[StorageKey::PaymentData, StorageKey::SignupDraft]).await?;

        tracing::info!(student_id = %submission.student_id, "Payment proof submitted");
        Ok(Outcome::Done(PaymentOutcome {
            payment,
            redirect: Redirect::after(
                Route::StudentDashboard,
                client.settings().payment_redirect_delay(),
            ),
            message: Some("Payment submitted successfully!".to_string()),
        }))
    }
}
