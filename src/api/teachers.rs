use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;
use crate::schemas::{Assignment, Broadcast, Message, StudentSummary, Subject};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBroadcast {
    pub teacher_id: String,
    pub subject_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub class_name: String,
    pub subject_id: String,
    pub teacher_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reply<'a> {
    reply: &'a str,
    teacher_id: &'a str,
}

impl ApiClient {
    pub(crate) async fn teacher_subjects(
        &self,
        teacher_id: &str,
        token: &str,
    ) -> Result<Vec<Subject>, ApiError> {
        let body = self.get(&Endpoint::TeacherSubjects(teacher_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["subjects"]))
    }

    pub(crate) async fn teacher_students(
        &self,
        teacher_id: &str,
        token: &str,
    ) -> Result<Vec<StudentSummary>, ApiError> {
        let body = self.get(&Endpoint::TeacherStudents(teacher_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["students"]))
    }

    pub(crate) async fn teacher_assignments(
        &self,
        teacher_id: &str,
        token: &str,
    ) -> Result<Vec<Assignment>, ApiError> {
        let body =
            self.get(&Endpoint::TeacherAssignments(teacher_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["assignments"]))
    }

    pub(crate) async fn teacher_broadcasts(
        &self,
        teacher_id: &str,
        token: &str,
    ) -> Result<Vec<Broadcast>, ApiError> {
        let body =
            self.get(&Endpoint::TeacherBroadcasts(teacher_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["broadcasts"]))
    }

    pub(crate) async fn teacher_messages(
        &self,
        teacher_id: &str,
        token: &str,
    ) -> Result<Vec<Message>, ApiError> {
        let body = self.get(&Endpoint::TeacherMessages(teacher_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["messages"]))
    }

    pub(crate) async fn send_broadcast(
        &self,
        broadcast: &NewBroadcast,
        token: &str,
    ) -> Result<(), ApiError> {
        self.send_json(&Endpoint::SendBroadcast, Some(token), Some(broadcast)).await?;
        Ok(())
    }

    pub(crate) async fn post_assignment(
        &self,
        assignment: &NewAssignment,
        token: &str,
    ) -> Result<(), ApiError> {
        self.send_json(&Endpoint::PostAssignment, Some(token), Some(assignment)).await?;
        Ok(())
    }

    pub(crate) async fn reply_to_message(
        &self,
        message_id: &str,
        teacher_id: &str,
        reply: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        let endpoint = Endpoint::ReplyMessage(message_id.to_string());
        self.send_json(&endpoint, Some(token), Some(&Reply { reply, teacher_id })).await?;
        Ok(())
    }
}
