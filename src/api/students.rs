use reqwest::multipart::Form;

use crate::api::attachment::Attachment;
use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;
use crate::schemas::{Assignment, Broadcast, Role, Subject, UserProfile};

#[derive(Debug, Clone)]
pub enum AssignmentAnswer {
    Typed(String),
    File(Attachment),
}

impl AssignmentAnswer {
    fn mode(&self) -> &'static str {
        match self {
            AssignmentAnswer::Typed(_) => "typed",
            AssignmentAnswer::File(_) => "file",
        }
    }
}

impl ApiClient {
    pub(crate) async fn student_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let body = self.get(&Endpoint::StudentProfile, Some(token)).await?;
        normalize::profile(&body, Role::Student)
    }

    pub(crate) async fn student_subjects(
        &self,
        student_id: &str,
        token: &str,
    ) -> Result<Vec<Subject>, ApiError> {
        let body = self.get(&Endpoint::StudentSubjects(student_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["subjects"]))
    }

    pub(crate) async fn student_broadcasts(
        &self,
        student_id: &str,
        token: &str,
    ) -> Result<Vec<Broadcast>, ApiError> {
        let body =
            self.get(&Endpoint::StudentBroadcasts(student_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["broadcasts"]))
    }

    pub(crate) async fn student_assignments(
        &self,
        student_id: &str,
        token: &str,
    ) -> Result<Vec<Assignment>, ApiError> {
        let body =
            self.get(&Endpoint::StudentAssignments(student_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["assignments"]))
    }

    pub(crate) async fn submit_assignment(
        &self,
        assignment_id: &str,
        answer: AssignmentAnswer,
        token: &str,
    ) -> Result<Option<String>, ApiError> {
        let mut form = Form::new().text("mode", answer.mode());
        form = match answer {
            AssignmentAnswer::Typed(text) => form.text("typedAnswer", text),
            AssignmentAnswer::File(file) => form.part("file", file.into_part()?),
        };
        let endpoint = Endpoint::SubmitAssignment(assignment_id.to_string());
        let body = self.send_multipart(&endpoint, Some(token), form).await?;
        Ok(normalize::message(&body))
    }
}
