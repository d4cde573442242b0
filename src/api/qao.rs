use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;
use crate::schemas::{Kpi, Message, Notification, Resource, TeacherSummary};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub receiver: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddressedMessage<'a> {
    sender_role: &'static str,
    receiver_role: &'static str,
    #[serde(flatten)]
    message: &'a OutgoingMessage,
}

impl ApiClient {
    pub(crate) async fn qao_teachers(&self, token: &str) -> Result<Vec<TeacherSummary>, ApiError> {
        let body = self.get(&Endpoint::QaoTeachers, Some(token)).await?;
        Ok(normalize::list(&body, &["teachers"]))
    }

    pub(crate) async fn qao_resources(&self, token: &str) -> Result<Vec<Resource>, ApiError> {
        let body = self.get(&Endpoint::QaoResources, Some(token)).await?;
        Ok(normalize::list(&body, &["resources"]))
    }

    pub(crate) async fn qao_kpis(&self, token: &str) -> Result<Vec<Kpi>, ApiError> {
        let body = self.get(&Endpoint::QaoKpis, Some(token)).await?;
        Ok(normalize::list(&body, &["kpis"]))
    }

    pub(crate) async fn qao_inbox(&self, token: &str) -> Result<Vec<Message>, ApiError> {
        let body = self.get(&Endpoint::QaoInbox, Some(token)).await?;
        Ok(normalize::list(&body, &["messages"]))
    }

    pub(crate) async fn qao_notifications(&self, token: &str) -> Result<Vec<Notification>, ApiError> {
        let body = self.get(&Endpoint::QaoNotifications, Some(token)).await?;
        Ok(normalize::list(&body, &["notifications"]))
    }

    pub(crate) async fn review_resource(
        &self,
        resource_id: &str,
        approved: bool,
        token: &str,
    ) -> Result<(), ApiError> {
        let endpoint = Endpoint::ReviewResource(resource_id.to_string());
        let payload = serde_json::json!({ "approved": approved });
        self.send_json(&endpoint, Some(token), Some(&payload)).await?;
        Ok(())
    }

    /// Sends a QAO-to-teacher message.
    pub(crate) async fn send_qao_message(
        &self,
        message: &OutgoingMessage,
        token: &str,
    ) -> Result<(), ApiError> {
        let payload = AddressedMessage { sender_role: "qao", receiver_role: "teacher", message };
        self.send_json(&Endpoint::SendMessage, Some(token), Some(&payload)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn addressed_message_flattens_fields() {
        let message = OutgoingMessage {
            receiver: "t1".into(),
            subject: "Lesson plans".into(),
            message: "Please upload week 4".into(),
        };
        let value = serde_json::to_value(AddressedMessage {
            sender_role: "qao",
            receiver_role: "teacher",
            message: &message,
        })
        .expect("json");
        assert_eq!(
            value,
            json!({
                "senderRole": "qao",
                "receiverRole": "teacher",
                "receiver": "t1",
                "subject": "Lesson plans",
                "message": "Please upload week 4"
            })
        );
    }
}
