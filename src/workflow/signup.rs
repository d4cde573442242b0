//! Registration state machine.
//!
//! The synchronous methods on [`SignupFlow`] are the transitions; the async ones drive them
//! against the backend and persist the draft after every change so a restart resumes where
//! the user left off.

use serde::Serialize;
use validator::Validate;

use crate::api::{ApiError, SignupReceipt};
use crate::core::config::Settings;
use crate::core::state::ClientState;
use crate::schemas::{
    signup::{normalize_package_key, total_for},
    PaymentDraft, PaymentUser, Role, Session, SignupDraft, Subject, UserProfile,
};
use crate::session::StorageKey;
use crate::workflow::navigation::{Redirect, Route};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SignupState {
    Editing { grade_set: bool },
    SubjectsLoading,
    SubjectsReady,
    Submitting,
    Succeeded,
    Failed { reason: String },
}

/// Key of one subject-list request. Results for any other key are stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectQuery {
    pub package_key: String,
    pub grade: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectBounds {
    pub min: usize,
    pub max: usize,
}

impl SubjectBounds {
    pub fn from_settings(settings: &Settings) -> Self {
        let signup = settings.signup();
        Self { min: signup.student_min_subjects, max: signup.student_max_subjects }
    }
}

impl Default for SubjectBounds {
    fn default() -> Self {
        Self { min: 2, max: 3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    FullName,
    Email,
    Phone,
    Password,
    Duration,
}

impl std::str::FromStr for SignupField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(&['-', '_'][..], "").as_str() {
            "fullname" | "name" => Ok(SignupField::FullName),
            "email" => Ok(SignupField::Email),
            "phone" => Ok(SignupField::Phone),
            "password" => Ok(SignupField::Password),
            "duration" => Ok(SignupField::Duration),
            other => Err(format!("unknown signup field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupOutcome {
    pub user: UserProfile,
    pub redirect: Redirect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Signup form state. The synchronous transitions only change memory; call `save` after
/// them, or use the async wrappers (`select_grade`, `toggle`) which persist the draft.
#[derive(Debug, Clone)]
pub struct SignupFlow {
    draft: SignupDraft,
    state: SignupState,
    subjects: Vec<Subject>,
    pending: Option<SubjectQuery>,
    last_error: Option<String>,
    bounds: SubjectBounds,
}

impl SignupFlow {
    pub fn new(role: Role, bounds: SubjectBounds) -> Self {
        Self::resume(SignupDraft::new(role), bounds)
    }

    /// Rebuilds a flow around a persisted draft. Subjects are not persisted, so the flow
    /// starts in `Editing` and keeps the cached total until subjects are fetched again.
    pub fn resume(draft: SignupDraft, bounds: SubjectBounds) -> Self {
        let grade_set = draft.grade.as_deref().is_some_and(|grade| !grade.trim().is_empty());
        Self {
            draft,
            state: SignupState::Editing { grade_set },
            subjects: Vec::new(),
            pending: None,
            last_error: None,
            bounds,
        }
    }

    pub fn draft(&self) -> &SignupDraft {
        &self.draft
    }

    pub fn state(&self) -> &SignupState {
        &self.state
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn total_amount(&self) -> f64 {
        self.draft.total_amount
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn pending_query(&self) -> Option<&SubjectQuery> {
        self.pending.as_ref()
    }

    pub fn selected_subjects(&self) -> Vec<Subject> {
        self.subjects
            .iter()
            .filter(|subject| self.draft.selected_subject_ids.contains(&subject.id))
            .cloned()
            .collect()
    }

    fn grade_set(&self) -> bool {
        self.draft.grade.as_deref().is_some_and(|grade| !grade.trim().is_empty())
    }

    fn subjects_loaded(&self) -> bool {
        matches!(self.state, SignupState::SubjectsReady | SignupState::Failed { .. })
    }

    fn recompute_total(&mut self) {
        self.draft.total_amount = total_for(&self.subjects, &self.draft.selected_subject_ids);
    }

    fn drop_subjects(&mut self) {
        self.subjects.clear();
        self.pending = None;
        self.recompute_total();
        if matches!(
            self.state,
            SignupState::SubjectsLoading | SignupState::SubjectsReady | SignupState::Failed { .. }
        ) {
            self.state = SignupState::Editing { grade_set: self.grade_set() };
        }
    }

    pub fn set_field(&mut self, field: SignupField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SignupField::FullName => self.draft.full_name = value,
            SignupField::Email => self.draft.email = value,
            SignupField::Phone => self.draft.phone = value,
            SignupField::Password => self.draft.password = value,
            SignupField::Duration => {
                self.draft.duration = Some(value).filter(|duration| !duration.trim().is_empty())
            }
        }
    }

    /// Changing the curriculum invalidates loaded subjects; the next grade selection refetches.
    pub fn set_curriculum(&mut self, curriculum: impl Into<String>) {
        let curriculum = curriculum.into();
        if curriculum != self.draft.curriculum {
            self.draft.curriculum = curriculum;
            self.drop_subjects();
        }
    }

    pub fn set_package(&mut self, package: impl Into<String>) {
        let package = package.into();
        if package != self.draft.package {
            self.draft.package = package;
            self.drop_subjects();
        }
    }

    /// Records the grade and moves to `SubjectsLoading`. The returned query must be passed
    /// back to [`SignupFlow::apply_subjects`] with the fetch result.
    pub fn begin_grade_selection(&mut self, grade: &str) -> Result<SubjectQuery, ApiError> {
        let grade = grade.trim();
        if grade.is_empty() {
            return Err(ApiError::validation("Please select a grade"));
        }
        let package_key = normalize_package_key(&self.draft.package);
        if package_key.is_empty() {
            return Err(ApiError::validation("Please select a package before choosing a grade"));
        }
        if matches!(self.state, SignupState::Submitting | SignupState::Succeeded) {
            return Err(ApiError::validation("Signup is no longer editable"));
        }

        self.draft.grade = Some(grade.to_string());
        let query = SubjectQuery { package_key, grade: grade.to_string() };
        self.pending = Some(query.clone());
        self.last_error = None;
        self.state = SignupState::SubjectsLoading;
        Ok(query)
    }

    /// Applies a subject fetch result. Returns `false` when the result is stale and was
    /// ignored.
    pub fn apply_subjects(
        &mut self,
        query: &SubjectQuery,
        result: &Result<Vec<Subject>, ApiError>,
    ) -> bool {
        if self.pending.as_ref() != Some(query) {
            tracing::debug!(grade = %query.grade, "Ignoring stale subject list");
            return false;
        }
        self.pending = None;

        match result {
            Ok(subjects) => {
                self.subjects = subjects.clone();
                self.last_error = None;
                self.state = SignupState::SubjectsReady;
            }
            Err(err) => {
                self.subjects.clear();
                self.last_error = Some(err.user_message());
                self.state = SignupState::Editing { grade_set: true };
            }
        }

        let known = &self.subjects;
        self.draft.selected_subject_ids.retain(|id| known.iter().any(|subject| &subject.id == id));
        self.recompute_total();
        true
    }

    pub fn toggle_subject(&mut self, subject_id: &str) -> Result<(), ApiError> {
        if !self.subjects_loaded() {
            return Err(ApiError::validation("Subjects are not loaded yet"));
        }
        if !self.subjects.iter().any(|subject| subject.id == subject_id) {
            return Err(ApiError::validation(format!("Unknown subject '{subject_id}'")));
        }

        let selected = &mut self.draft.selected_subject_ids;
        match selected.iter().position(|id| id == subject_id) {
            Some(index) => {
                selected.remove(index);
            }
            None => selected.push(subject_id.to_string()),
        }
        self.recompute_total();
        self.state = SignupState::SubjectsReady;
        Ok(())
    }

    /// Local precondition for submission: field validation plus the student subject bound.
    pub fn submission_check(&self) -> Result<(), ApiError> {
        self.draft.validate()?;

        let ready = match self.draft.role {
            Role::Student => self.subjects_loaded(),
            _ => matches!(
                self.state,
                SignupState::Editing { .. } | SignupState::SubjectsReady | SignupState::Failed { .. }
            ),
        };
        if !ready {
            return Err(ApiError::validation("Select a grade and wait for subjects to load"));
        }

        if self.draft.role == Role::Student {
            let count = self.draft.selected_subject_ids.len();
            if count < self.bounds.min || count > self.bounds.max {
                return Err(ApiError::validation(format!(
                    "Select between {} and {} subjects (currently {count})",
                    self.bounds.min, self.bounds.max
                )));
            }
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.submission_check().is_ok()
    }

    pub fn begin_submit(&mut self) -> Result<SignupDraft, ApiError> {
        self.submission_check()?;
        self.state = SignupState::Submitting;
        Ok(self.draft.clone())
    }

    pub fn finish_submit(&mut self, result: &Result<SignupReceipt, ApiError>) {
        self.state = match result {
            Ok(_) => SignupState::Succeeded,
            Err(err) => SignupState::Failed { reason: err.user_message() },
        };
    }

    /// Payment handoff for a registered student.
    pub fn payment_draft(&self, user: &UserProfile) -> PaymentDraft {
        let mut payment_user = PaymentUser::from(user);
        if payment_user.full_name.is_empty() {
            payment_user.full_name = self.draft.full_name.trim().to_string();
        }
        if payment_user.email.is_empty() {
            payment_user.email = self.draft.email.trim().to_string();
        }
        if payment_user.phone.is_empty() {
            payment_user.phone = self.draft.phone.trim().to_string();
        }

        PaymentDraft {
            user: payment_user,
            curriculum: self.draft.curriculum.clone(),
            grade: self.draft.grade.clone().unwrap_or_default(),
            package: self.draft.package.clone(),
            total_amount: self.draft.total_amount,
            subjects: self.selected_subjects(),
            duration: self.draft.duration.clone().unwrap_or_default(),
        }
    }

    // Backend-driven operations.

    pub async fn start(client: &ClientState, role: Role) -> Result<Self, ApiError> {
        let flow = Self::new(role, SubjectBounds::from_settings(client.settings()));
        flow.save(client).await?;
        Ok(flow)
    }

    pub async fn load(client: &ClientState) -> Option<Self> {
        let draft = client.store().signup_draft().await?;
        Some(Self::resume(draft, SubjectBounds::from_settings(client.settings())))
    }

    pub async fn save(&self, client: &ClientState) -> Result<(), ApiError> {
        client.store().set_json(StorageKey::SignupDraft, &self.draft).await?;
        Ok(())
    }

    pub async fn select_grade(&mut self, client: &ClientState, grade: &str) -> Result<(), ApiError> {
        let query = self.begin_grade_selection(grade)?;
        let result = client.api().subjects_by_package(&query.package_key, &query.grade).await;
        self.apply_subjects(&query, &result);
        self.save(client).await?;
        result.map(|_| ())
    }

    pub async fn toggle(&mut self, client: &ClientState, subject_id: &str) -> Result<(), ApiError> {
        self.toggle_subject(subject_id)?;
        self.save(client).await
    }

    /// Refetches subjects for the stored grade when a resumed flow has none loaded.
    pub async fn ensure_subjects(&mut self, client: &ClientState) -> Result<(), ApiError> {
        if self.subjects_loaded() {
            return Ok(());
        }
        match self.draft.grade.clone().filter(|grade| !grade.trim().is_empty()) {
            Some(grade) => self.select_grade(client, &grade).await,
            None => Ok(()),
        }
    }

    pub async fn submit(&mut self, client: &ClientState) -> Result<SignupOutcome, ApiError> {
        self.submission_check()?;
        self.save(client).await?;
        let draft = self.begin_submit()?;

        let result = client.api().signup(&draft).await;
        self.finish_submit(&result);
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(err) => {
                metrics::counter!("signup_submissions_total", "outcome" => "failure").increment(1);
                tracing::warn!(error = %err, role = %draft.role, "Signup failed; draft retained");
                return Err(err);
            }
        };
        metrics::counter!("signup_submissions_total", "outcome" => "success").increment(1);

        let store = client.store();
        store.set_json(StorageKey::User, &receipt.user).await?;
        if let Some(token) = receipt.token.clone() {
            let session =
                Session { token, user_id: receipt.user.id.clone(), role: receipt.user.role };
            store.save_session(&session, Some(&receipt.user)).await?;
        }

        let outcome = if draft.role == Role::Student {
            let payment = self.payment_draft(&receipt.user);
            store.set_json(StorageKey::PaymentData, &payment).await?;
            SignupOutcome {
                user: receipt.user,
                redirect: Redirect::now(Route::Payment),
                payment: Some(payment),
                message: receipt.message,
            }
        } else {
            store.clear(&[StorageKey::SignupDraft]).await?;
            let route = if receipt.token.is_some() {
                Route::dashboard_for(receipt.user.role)
            } else {
                Route::Login
            };
            SignupOutcome {
                user: receipt.user,
                redirect: Redirect::now(route),
                payment: None,
                message: receipt.message,
            }
        };

        tracing::info!(role = %draft.role, user_id = %outcome.user.id, "Signup succeeded");
        Ok(outcome)
    }
}
