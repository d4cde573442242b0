//! Reconciles the backend's response shapes into the crate's types. Nothing past this module
//! looks at wrapper keys like `user`, `data` or `success`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::schemas::{Role, UserProfile};

/// Auth responses carry the account under `user` or `data`. Anything else, or a record with
/// no id, is missing data.
pub(crate) fn auth_user(body: &Value, fallback_role: Role) -> Result<UserProfile, ApiError> {
    ["user", "data"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|record| UserProfile::from_record(record, fallback_role))
        .ok_or(ApiError::MissingData("user data"))
}

/// `/me`-style responses may also return the record unwrapped.
pub(crate) fn profile(body: &Value, fallback_role: Role) -> Result<UserProfile, ApiError> {
    auth_user(body, fallback_role).or_else(|_| {
        UserProfile::from_record(body, fallback_role).ok_or(ApiError::MissingData("profile"))
    })
}

pub(crate) fn token(body: &Value) -> Option<String> {
    body.get("token")
        .or_else(|| body.get("data").and_then(|data| data.get("token")))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(ToString::to_string)
}

/// `success: false` on a 2xx response.
pub(crate) fn declined(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).is_some_and(|success| !success)
}

pub(crate) fn error_message(body: &Value) -> String {
    if let Some(detail) = body.get("detail") {
        if let Some(text) = detail.as_str() {
            return text.to_string();
        }
        if let Some(items) = detail.as_array() {
            let joined = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .or_else(|| item.get("message").and_then(Value::as_str))
                })
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return joined;
            }
        }
    }

    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .unwrap_or("Request failed")
        .to_string()
}

/// Moves a Mongo-style `_id` to `id` so typed records only ever see `id`.
pub(crate) fn canonical_ids(mut value: Value) -> Value {
    if let Some(object) = value.as_object_mut() {
        if let Some(raw_id) = object.remove("_id") {
            object.entry("id").or_insert(raw_id);
        }
    }
    value
}

/// Lists arrive bare or wrapped under one of `keys`. Items that do not deserialize are
/// skipped.
pub(crate) fn list<T: DeserializeOwned>(body: &Value, keys: &[&str]) -> Vec<T> {
    let items = match body {
        Value::Array(items) => Some(items),
        Value::Object(object) => {
            keys.iter().chain(["data"].iter()).find_map(|key| object.get(*key)?.as_array())
        }
        _ => None,
    };

    let Some(items) = items else {
        tracing::warn!(keys = ?keys, "Expected a list in response; treating as empty");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(canonical_ids(item.clone())) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed list item");
                None
            }
        })
        .collect()
}

/// A single record, either wrapped under one of `keys` or `data`, or returned bare.
pub(crate) fn record<T: DeserializeOwned>(body: &Value, keys: &[&str]) -> Option<T> {
    let candidate = keys
        .iter()
        .chain(["data"].iter())
        .find_map(|key| body.get(*key).filter(|value| value.is_object()))
        .unwrap_or(body);

    if !candidate.is_object() {
        return None;
    }
    serde_json::from_value(canonical_ids(candidate.clone())).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{PaymentRecord, Subject};
    use serde_json::json;

    #[test]
    fn auth_user_accepts_user_or_data() {
        let from_user =
            auth_user(&json!({"token": "t", "user": {"_id": "u1", "role": "teacher"}}), Role::Student)
                .expect("user");
        assert_eq!(from_user.id, "u1");
        assert_eq!(from_user.role, Role::Teacher);

        let from_data =
            auth_user(&json!({"data": {"id": "u2", "fullName": "Kofi"}}), Role::Student).expect("data");
        assert_eq!(from_data.id, "u2");
        assert_eq!(from_data.role, Role::Student);
    }

    #[test]
    fn auth_user_without_record_id_is_missing_data() {
        for body in [
            json!({"token": "t"}),
            json!({"student": {"_id": "u1"}}),
            json!({"user": {"fullName": "No Id"}}),
            json!({"data": "u1"}),
        ] {
            assert!(matches!(auth_user(&body, Role::Student), Err(ApiError::MissingData(_))));
        }
    }

    #[test]
    fn profile_falls_back_to_bare_record() {
        let parsed = profile(&json!({"_id": "s9", "fullName": "Esi"}), Role::Student).expect("bare");
        assert_eq!(parsed.id, "s9");
    }

    #[test]
    fn token_lookup_checks_data() {
        assert_eq!(token(&json!({"token": "top"})).as_deref(), Some("top"));
        assert_eq!(token(&json!({"data": {"token": "inner"}})).as_deref(), Some("inner"));
        assert_eq!(token(&json!({"token": "  "})), None);
    }

    #[test]
    fn list_accepts_bare_and_wrapped_arrays() {
        let bare: Vec<Subject> = list(&json!([{"_id": "a", "name": "Maths", "price": 10}]), &[]);
        assert_eq!(bare[0].id, "a");

        let wrapped: Vec<Subject> =
            list(&json!({"subjects": [{"id": "b", "name": "English", "price": "5"}, 4]}), &["subjects"]);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].price, 5.0);

        let nothing: Vec<Subject> = list(&json!({"message": "none"}), &["subjects"]);
        assert!(nothing.is_empty());
    }

    #[test]
    fn canonical_ids_keeps_existing_id() {
        let value = canonical_ids(json!({"_id": "mongo", "id": "kept"}));
        assert_eq!(value, json!({"id": "kept"}));
    }

    #[test]
    fn record_unwraps_known_key() {
        let payment: PaymentRecord = record(
            &json!({"message": "ok", "payment": {"studentId": "s1", "amount": 200, "status": "pending"}}),
            &["payment"],
        )
        .expect("payment");
        assert_eq!(payment.student_id, "s1");
        assert_eq!(payment.amount, 200.0);
    }

    #[test]
    fn error_message_prefers_detail_then_message() {
        assert_eq!(error_message(&json!({"detail": "bad"})), "bad");
        assert_eq!(error_message(&json!({"message": "Email taken"})), "Email taken");
        assert_eq!(error_message(&json!({"error": "boom"})), "boom");
        assert_eq!(error_message(&json!({})), "Request failed");
    }
}
