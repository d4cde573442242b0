use serde::Serialize;

use crate::api::{ApiError, AssignmentAnswer};
use crate::core::state::ClientState;
use crate::dashboard::{expire, mutate_then_refresh, rejected, ActionReceipt, Outcome, Section};
use crate::schemas::{Assignment, Broadcast, PaymentRecord, Role, Session, Subject, UserProfile};
use crate::workflow::{Redirect, Route};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub profile: Section<UserProfile>,
    pub subjects: Section<Vec<Subject>>,
    pub broadcasts: Section<Vec<Broadcast>>,
    pub payments: Section<Vec<PaymentRecord>>,
    pub assignments: Section<Vec<Assignment>>,
    pub latest_payment: Option<PaymentRecord>,
    pub duration_display: String,
    pub notifications: Vec<String>,
}

impl StudentDashboard {
    fn assemble(
        profile: Section<UserProfile>,
        stored_user: Option<UserProfile>,
        subjects: Section<Vec<Subject>>,
        broadcasts: Section<Vec<Broadcast>>,
        payments: Section<Vec<PaymentRecord>>,
        assignments: Section<Vec<Assignment>>,
    ) -> Self {
        let user = profile.ready().cloned().or(stored_user);
        let latest_payment = payments.ready().and_then(|list| list.last().cloned());
        let duration_display = latest_payment
            .as_ref()
            .and_then(|payment| payment.duration.clone())
            .filter(|duration| !duration.trim().is_empty())
            .or_else(|| {
                user.as_ref().and_then(|user| user.field_str("studyDuration")).map(ToString::to_string)
            })
            .unwrap_or_else(|| "N/A".to_string());
        let name = user.as_ref().map(UserProfile::display_name).unwrap_or("Student");

        Self {
            notifications: vec![format!("Welcome back, {name}!")],
            profile,
            subjects,
            broadcasts,
            payments,
            assignments,
            latest_payment,
            duration_display,
        }
    }
}

async fn student_session(client: &ClientState) -> Option<Session> {
    client.store().session().await.filter(|session| session.role == Role::Student)
}

pub async fn load(client: &ClientState) -> Result<Outcome<StudentDashboard>, ApiError> {
    let Some(session) = student_session(client).await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::Login)));
    };
    let api = client.api();
    let (token, id) = (session.token.as_str(), session.user_id.as_str());

    let (profile, subjects, broadcasts, payments, assignments) = tokio::join!(
        api.student_profile(token),
        api.student_subjects(id, token),
        api.student_broadcasts(id, token),
        api.payment_history(id, token),
        api.student_assignments(id, token),
    );

    if rejected(&profile)
        || rejected(&subjects)
        || rejected(&broadcasts)
        || rejected(&payments)
        || rejected(&assignments)
    {
        return Ok(Outcome::Redirect(expire(client, Role::Student).await?));
    }

    let stored_user = client.store().user().await;
    Ok(Outcome::Done(StudentDashboard::assemble(
        profile.into(),
        stored_user,
        subjects.into(),
        broadcasts.into(),
        payments.into(),
        assignments.into(),
    )))
}

pub async fn submit_assignment(
    client: &ClientState,
    assignment_id: &str,
    answer: AssignmentAnswer,
) -> Result<Outcome<ActionReceipt<Vec<Assignment>>>, ApiError> {
    if assignment_id.trim().is_empty() {
        return Err(ApiError::validation("Choose an assignment to submit"));
    }
    match &answer {
        AssignmentAnswer::Typed(text) if text.trim().is_empty() => {
            return Err(ApiError::validation("Type your answer before submitting"));
        }
        AssignmentAnswer::File(file) if file.is_empty() => {
            return Err(ApiError::validation("Attach a file before submitting"));
        }
        _ => {}
    }

    let Some(session) = student_session(client).await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::Login)));
    };
    let api = client.api();
    let (token, id) = (session.token.as_str(), session.user_id.as_str());

    mutate_then_refresh(
        client,
        Role::Student,
        api.submit_assignment(assignment_id.trim(), answer, token),
        || api.student_assignments(id, token),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Attachment;
    use crate::test_support;
    use axum::{
        extract::Multipart,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Fields = Arc<Mutex<Vec<(String, String)>>>;

    fn payment(duration: Option<&str>) -> PaymentRecord {
        PaymentRecord { duration: duration.map(ToString::to_string), ..PaymentRecord::default() }
    }

    fn profile(record: serde_json::Value) -> UserProfile {
        UserProfile::from_record(&record, Role::Student).expect("profile")
    }

    #[test]
    fn duration_prefers_latest_payment() {
        let dashboard = StudentDashboard::assemble(
            Section::Ready(profile(json!({"_id": "s1", "studyDuration": "6 months"}))),
            None,
            Section::Ready(vec![]),
            Section::Ready(vec![]),
            Section::Ready(vec![payment(Some("1 month")), payment(Some("3 months"))]),
            Section::Ready(vec![]),
        );
        assert_eq!(dashboard.duration_display, "3 months");
        assert_eq!(
            dashboard.latest_payment.and_then(|payment| payment.duration).as_deref(),
            Some("3 months")
        );
    }

    #[test]
    fn duration_falls_back_to_profile_then_na() {
        let from_profile = StudentDashboard::assemble(
            Section::Ready(profile(json!({"_id": "s1", "fullName": "Esi", "studyDuration": "6 months"}))),
            None,
            Section::Ready(vec![]),
            Section::Ready(vec![]),
            Section::Failed("down".into()),
            Section::Ready(vec![]),
        );
        assert_eq!(from_profile.duration_display, "6 months");
        assert_eq!(from_profile.notifications, vec!["Welcome back, Esi!".to_string()]);

        let nothing = StudentDashboard::assemble(
            Section::Failed("down".into()),
            None,
            Section::Ready(vec![]),
            Section::Ready(vec![]),
            Section::Ready(vec![payment(None)]),
            Section::Ready(vec![]),
        );
        assert_eq!(nothing.duration_display, "N/A");
        assert_eq!(nothing.notifications, vec!["Welcome back, Student!".to_string()]);
    }

    #[test]
    fn stored_user_names_the_welcome_when_profile_fails() {
        let dashboard = StudentDashboard::assemble(
            Section::Failed("down".into()),
            Some(profile(json!({"_id": "s1", "fullName": "Kojo"}))),
            Section::Ready(vec![]),
            Section::Ready(vec![]),
            Section::Ready(vec![]),
            Section::Ready(vec![]),
        );
        assert_eq!(dashboard.notifications[0], "Welcome back, Kojo!");
    }

    fn backend(profile_status: StatusCode) -> Router {
        Router::new()
            .route(
                "/api/students/me",
                get(move || async move {
                    (profile_status, Json(json!({"_id": "s1", "fullName": "Esi", "role": "student"})))
                }),
            )
            .route(
                "/api/students/:id/subjects",
                get(|| async { Json(json!([{"_id": "m", "name": "Maths", "price": 100}])) }),
            )
            .route("/api/students/broadcasts/:id", get(|| async { Json(json!({"broadcasts": []})) }))
            .route(
                "/api/students/payments/:id",
                get(|| async {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "Database down"})))
                }),
            )
            .route("/api/students/assignments/:id", get(|| async { Json(json!([])) }))
    }

    #[tokio::test]
    async fn load_degrades_failed_sections_independently() {
        let base_url = test_support::serve(backend(StatusCode::OK)).await;
        let client = test_support::client_state(&base_url);
        test_support::sign_in(&client, Role::Student, "s1", "tok").await;

        let dashboard = load(&client).await.expect("load").done().expect("dashboard");
        assert_eq!(dashboard.payments, Section::Failed("Database down".into()));
        assert_eq!(dashboard.subjects.ready().map(Vec::len), Some(1));
        assert!(dashboard.broadcasts.is_ready());
        assert_eq!(dashboard.notifications, vec!["Welcome back, Esi!".to_string()]);
        assert_eq!(dashboard.duration_display, "N/A");
    }

    #[tokio::test]
    async fn rejected_token_signs_the_student_out() {
        let base_url = test_support::serve(backend(StatusCode::UNAUTHORIZED)).await;
        let client = test_support::client_state(&base_url);
        test_support::sign_in(&client, Role::Student, "s1", "stale").await;

        let outcome = load(&client).await.expect("load");
        assert_eq!(outcome.redirect().map(Redirect::path), Some("/login"));
        assert!(client.store().session().await.is_none());
        assert!(client.store().user().await.is_none());
    }

    #[tokio::test]
    async fn missing_session_redirects_without_network() {
        let client = test_support::client_state("http://127.0.0.1:9");
        let outcome = load(&client).await.expect("load");
        assert_eq!(outcome.redirect().map(Redirect::path), Some("/login"));
    }

    fn submission_backend(fields: Fields) -> Router {
        let submit = post(move |mut multipart: Multipart| {
            let fields = fields.clone();
            async move {
                while let Some(field) = multipart.next_field().await.expect("multipart field") {
                    let name = field.name().unwrap_or_default().to_string();
                    let value = match field.file_name().map(str::to_string) {
                        Some(file_name) => file_name,
                        None => field.text().await.expect("text field"),
                    };
                    fields.lock().expect("fields").push((name, value));
                }
                Json(json!({"message": "Assignment submitted"}))
            }
        });
        Router::new()
            .route("/api/students/assignments/submit/:id", submit)
            .route(
                "/api/students/assignments/:id",
                get(|| async { Json(json!([{"_id": "a1", "title": "Essay", "status": "submitted"}])) }),
            )
    }

    #[tokio::test]
    async fn typed_submission_refetches_assignments() {
        let fields = Fields::default();
        let base_url = test_support::serve(submission_backend(fields.clone())).await;
        let client = test_support::client_state(&base_url);
        test_support::sign_in(&client, Role::Student, "s1", "tok").await;

        let receipt = submit_assignment(&client, " a1 ", AssignmentAnswer::Typed("My essay".into()))
            .await
            .expect("submit")
            .done()
            .expect("receipt");
        assert_eq!(receipt.message.as_deref(), Some("Assignment submitted"));
        let refreshed = receipt.refreshed.ready().expect("assignments");
        assert_eq!(refreshed[0].status.as_deref(), Some("submitted"));

        let sent = fields.lock().expect("fields").clone();
        assert_eq!(
            sent,
            vec![
                ("mode".to_string(), "typed".to_string()),
                ("typedAnswer".to_string(), "My essay".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn file_submission_sends_the_file_part() {
        let fields = Fields::default();
        let base_url = test_support::serve(submission_backend(fields.clone())).await;
        let client = test_support::client_state(&base_url);
        test_support::sign_in(&client, Role::Student, "s1", "tok").await;

        let file = Attachment::new("essay.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        let outcome = submit_assignment(&client, "a1", AssignmentAnswer::File(file)).await.expect("submit");
        assert!(outcome.done().is_some_and(|receipt| receipt.refreshed.is_ready()));

        let sent = fields.lock().expect("fields").clone();
        assert_eq!(
            sent,
            vec![
                ("mode".to_string(), "file".to_string()),
                ("file".to_string(), "essay.pdf".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn empty_answer_is_rejected_locally() {
        let client = test_support::client_state("http://127.0.0.1:9");
        let err = submit_assignment(&client, "a1", AssignmentAnswer::Typed("  ".into()))
            .await
            .expect_err("empty answer");
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
