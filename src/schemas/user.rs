use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schemas::de::record_id;
use crate::schemas::session::Role;

/// The single internal user shape every auth/profile response is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

const CONSUMED_KEYS: &[&str] = &["_id", "id", "role", "fullName", "name", "email", "phone"];

impl UserProfile {
    /// Builds a profile from a raw backend record. Returns `None` when the record has no id.
    pub(crate) fn from_record(record: &Value, fallback_role: Role) -> Option<Self> {
        let object = record.as_object()?;
        let id = record_id(record)?;

        let role = object
            .get("role")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<Role>().ok())
            .unwrap_or(fallback_role);

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        };

        let fields = object
            .iter()
            .filter(|(key, _)| !CONSUMED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            id,
            role,
            full_name: text("fullName").or_else(|| text("name")),
            email: text("email"),
            phone: text("phone"),
            fields,
        })
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or_else(|| match self.role {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Qao => "Officer",
            Role::Admin => "Admin",
        })
    }

    pub(crate) fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str).filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_record_maps_mongo_fields() {
        let record = json!({
            "_id": "64f0c2",
            "fullName": "Ama Mensah",
            "email": "ama@example.com",
            "phone": "0240000000",
            "studyDuration": "3 months",
            "role": "student"
        });

        let profile = UserProfile::from_record(&record, Role::Teacher).expect("profile");
        assert_eq!(profile.id, "64f0c2");
        assert_eq!(profile.role, Role::Student);
        assert_eq!(profile.full_name.as_deref(), Some("Ama Mensah"));
        assert_eq!(profile.field_str("studyDuration"), Some("3 months"));
        assert!(!profile.fields.contains_key("_id"));
    }

    #[test]
    fn from_record_falls_back_to_name_and_given_role() {
        let profile =
            UserProfile::from_record(&json!({"id": 7, "name": "Mr Owusu"}), Role::Teacher)
                .expect("profile");
        assert_eq!(profile.id, "7");
        assert_eq!(profile.role, Role::Teacher);
        assert_eq!(profile.display_name(), "Mr Owusu");
    }

    #[test]
    fn from_record_requires_an_id() {
        assert!(UserProfile::from_record(&json!({"fullName": "Nobody"}), Role::Student).is_none());
        assert!(UserProfile::from_record(&json!("string"), Role::Student).is_none());
    }

    #[test]
    fn profile_round_trips_through_json() {
        let profile = UserProfile::from_record(
            &json!({"_id": "1", "fullName": "Kofi", "grade": "JHS 2"}),
            Role::Student,
        )
        .expect("profile");
        let text = serde_json::to_string(&profile).expect("serialize");
        let back: UserProfile = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, profile);
    }
}
