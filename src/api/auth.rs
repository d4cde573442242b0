use serde::Serialize;
use serde_json::Value;

use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;
use crate::schemas::{AccountKind, Role, SignupDraft, UserProfile};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminCredentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest<'a> {
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
    password: &'a str,
    role: Role,
    curriculum: &'a str,
    package: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<&'a str>,
    subjects: &'a [String],
    total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<&'a str>,
}

impl<'a> From<&'a SignupDraft> for SignupRequest<'a> {
    fn from(draft: &'a SignupDraft) -> Self {
        Self {
            full_name: draft.full_name.trim(),
            email: draft.email.trim(),
            phone: draft.phone.trim(),
            password: &draft.password,
            role: draft.role,
            curriculum: &draft.curriculum,
            package: &draft.package,
            grade: draft.grade.as_deref(),
            subjects: &draft.selected_subject_ids,
            total_amount: draft.total_amount,
            duration: draft.duration.as_deref(),
        }
    }
}

/// A normalized login result: the account plus the bearer token it was issued.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone)]
pub struct SignupReceipt {
    pub user: UserProfile,
    pub token: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QaoGrant {
    pub token: String,
    pub user: Option<Value>,
}

impl ApiClient {
    pub(crate) async fn login(
        &self,
        kind: AccountKind,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        let body = self
            .send_json(&Endpoint::Login(kind), None, Some(&Credentials { email, password }))
            .await?;
        grant_from(&body, kind.role())
    }

    pub(crate) async fn admin_login(
        &self,
        email: &str,
        password: &str,
        admin_code: Option<&str>,
    ) -> Result<AuthGrant, ApiError> {
        let credentials = AdminCredentials { email, password, admin_code };
        let body = self.send_json(&Endpoint::AdminLogin, None, Some(&credentials)).await?;
        let mut grant = grant_from(&body, Role::Admin)?;
        grant.user.role = Role::Admin;
        Ok(grant)
    }

    pub(crate) async fn signup(&self, draft: &SignupDraft) -> Result<SignupReceipt, ApiError> {
        let body =
            self.send_json(&Endpoint::Signup, None, Some(&SignupRequest::from(draft))).await?;
        if normalize::declined(&body) {
            return Err(ApiError::Server {
                status: 200,
                message: normalize::message(&body).unwrap_or_else(|| "Signup failed".to_string()),
            });
        }
        let user = normalize::auth_user(&body, draft.role)?;
        Ok(SignupReceipt { user, token: normalize::token(&body), message: normalize::message(&body) })
    }

    pub(crate) async fn forget_password(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<String>, ApiError> {
        let payload = serde_json::json!({ "email": email });
        let body = self.send_json(&Endpoint::ForgetPassword(kind), None, Some(&payload)).await?;
        Ok(normalize::message(&body))
    }

    pub(crate) async fn reset_password(
        &self,
        kind: AccountKind,
        reset_token: &str,
        new_password: &str,
    ) -> Result<Option<String>, ApiError> {
        let endpoint = Endpoint::ResetPassword { kind, token: reset_token.to_string() };
        let payload = serde_json::json!({ "newPassword": new_password });
        let body = self.send_json(&endpoint, None, Some(&payload)).await?;
        Ok(normalize::message(&body))
    }

    pub(crate) async fn qao_access(&self, code: &str) -> Result<QaoGrant, ApiError> {
        let payload = serde_json::json!({ "qaoCode": code });
        let body = self.send_json(&Endpoint::QaoAccess, None, Some(&payload)).await?;

        let succeeded = body.get("success").and_then(Value::as_bool).unwrap_or(false);
        if !succeeded {
            return Err(ApiError::Server {
                status: 200,
                message: normalize::message(&body).unwrap_or_else(|| "Access denied".to_string()),
            });
        }

        let token = normalize::token(&body).ok_or(ApiError::MissingData("access token"))?;
        let user = body.get("user").or_else(|| body.get("qao")).filter(|user| user.is_object()).cloned();
        Ok(QaoGrant { token, user })
    }
}

fn grant_from(body: &Value, role: Role) -> Result<AuthGrant, ApiError> {
    let user = normalize::auth_user(body, role)?;
    let token = normalize::token(body).ok_or(ApiError::MissingData("token"))?;
    Ok(AuthGrant { token, user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signup_request_uses_backend_field_names() {
        let mut draft = SignupDraft::new(Role::Student);
        draft.full_name = " Ama Mensah ".into();
        draft.grade = Some("SHS 1".into());
        draft.selected_subject_ids = vec!["s1".into(), "s2".into()];
        draft.total_amount = 250.0;

        let value = serde_json::to_value(SignupRequest::from(&draft)).expect("json");
        assert_eq!(value["fullName"], "Ama Mensah");
        assert_eq!(value["subjects"], json!(["s1", "s2"]));
        assert_eq!(value["totalAmount"], json!(250.0));
        assert_eq!(value["role"], "student");
        assert!(value.get("duration").is_none());
    }

    #[test]
    fn grant_requires_token_and_user() {
        let ok = grant_from(&json!({"token": "t", "user": {"_id": "u1"}}), Role::Teacher).expect("grant");
        assert_eq!(ok.token, "t");
        assert_eq!(ok.user.role, Role::Teacher);

        assert!(matches!(
            grant_from(&json!({"user": {"_id": "u1"}}), Role::Student),
            Err(ApiError::MissingData("token"))
        ));
        assert!(matches!(
            grant_from(&json!({"token": "t"}), Role::Student),
            Err(ApiError::MissingData("user data"))
        ));
    }

    #[test]
    fn admin_code_is_omitted_when_absent() {
        let value = serde_json::to_value(AdminCredentials {
            email: "a@b.c",
            password: "pw",
            admin_code: None,
        })
        .expect("json");
        assert_eq!(value, json!({"email": "a@b.c", "password": "pw"}));
    }
}
