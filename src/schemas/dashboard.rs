//! Records shown on the role dashboards. Backends add fields freely, so every record keeps
//! the unknown ones in `extra` and every known field is optional or defaulted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schemas::de;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Broadcast {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub subject_name: Option<String>,
    pub message: String,
    pub teacher_name: Option<String>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assignment {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub class_name: Option<String>,
    #[serde(deserialize_with = "de::opt_id_string")]
    pub subject_id: Option<String>,
    pub subject_name: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub sender: Option<Value>,
    pub receiver: Option<Value>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub message: Option<String>,
    pub reply: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Teacher inbox messages carry `content`, QAO inbox messages carry `message`.
    pub fn body(&self) -> &str {
        self.content.as_deref().or(self.message.as_deref()).unwrap_or_default()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.date.as_deref().or(self.created_at.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub title: String,
    pub teacher_name: Option<String>,
    pub approved: Option<bool>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kpi {
    pub name: Option<String>,
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notification {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub message: String,
    pub created_at: Option<String>,
    pub read: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherSummary {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "de::string_or_list")]
    pub subjects: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentSummary {
    #[serde(deserialize_with = "de::id_string")]
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub grade: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Broadcast,
    Message,
}

/// One line of the teacher's recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub subject: Option<String>,
    pub message: String,
    pub time: Option<String>,
}

impl From<&Broadcast> for Activity {
    fn from(broadcast: &Broadcast) -> Self {
        Self {
            kind: ActivityKind::Broadcast,
            subject: Some(broadcast.subject_name.clone().unwrap_or_else(|| "General".to_string())),
            message: broadcast.message.clone(),
            time: broadcast.created_at.clone(),
        }
    }
}

impl From<&Message> for Activity {
    fn from(message: &Message) -> Self {
        Self {
            kind: ActivityKind::Message,
            subject: message.subject.clone(),
            message: message.body().to_string(),
            time: message.timestamp().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_body_prefers_content() {
        let message: Message = serde_json::from_value(json!({
            "id": "m1",
            "content": "Can we move class?",
            "message": "ignored",
            "date": "2025-02-01T09:00:00Z"
        }))
        .expect("message");
        assert_eq!(message.body(), "Can we move class?");
        assert_eq!(message.timestamp(), Some("2025-02-01T09:00:00Z"));

        let qao: Message =
            serde_json::from_value(json!({"message": "KPI review due", "createdAt": "x"}))
                .expect("message");
        assert_eq!(qao.body(), "KPI review due");
        assert_eq!(qao.timestamp(), Some("x"));
    }

    #[test]
    fn broadcast_activity_defaults_subject() {
        let broadcast: Broadcast =
            serde_json::from_value(json!({"id": 3, "message": "No class today"})).expect("broadcast");
        let activity = Activity::from(&broadcast);
        assert_eq!(activity.kind, ActivityKind::Broadcast);
        assert_eq!(activity.subject.as_deref(), Some("General"));
        assert_eq!(broadcast.id, "3");
    }

    #[test]
    fn records_keep_unknown_fields() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "r1",
            "title": "Week 3 slides",
            "approved": false,
            "fileType": "pdf"
        }))
        .expect("resource");
        assert_eq!(resource.approved, Some(false));
        assert_eq!(resource.extra.get("fileType"), Some(&json!("pdf")));
    }
}
