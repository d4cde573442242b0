use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schemas::de;
use crate::schemas::signup::Subject;
use crate::schemas::user::UserProfile;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&UserProfile> for PaymentUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            full_name: profile.full_name.clone().unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
        }
    }
}

/// Handoff from a successful signup to the payment step, persisted as `paymentData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentDraft {
    pub user: PaymentUser,
    pub curriculum: String,
    pub grade: String,
    pub package: String,
    pub total_amount: f64,
    pub subjects: Vec<Subject>,
    pub duration: String,
}

impl PaymentDraft {
    pub fn subject_names(&self) -> Vec<String> {
        self.subjects
            .iter()
            .map(|subject| subject.name.clone())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRecord {
    #[serde(deserialize_with = "de::id_string")]
    pub student_id: String,
    #[serde(deserialize_with = "de::amount")]
    pub amount: f64,
    pub package: String,
    #[serde(deserialize_with = "de::string_or_list")]
    pub subjects: Vec<String>,
    #[serde(alias = "screenshot")]
    pub screenshot_ref: String,
    pub transaction_date: String,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
