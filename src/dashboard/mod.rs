//! Role dashboards. Each `load` fetches its sections concurrently and degrades failed
//! sections independently; every mutation re-fetches the list it touched.

pub mod qao;
pub mod student;
pub mod teacher;

use serde::Serialize;

use crate::api::ApiError;
use crate::core::state::ClientState;
use crate::schemas::Role;
use crate::workflow::{Redirect, Route};

pub use qao::QaoDashboard;
pub use student::StudentDashboard;
pub use teacher::TeacherDashboard;

/// One independently loaded part of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Failed(String),
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            Section::Failed(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }
}

impl<T> From<Result<T, ApiError>> for Section<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(err) => Section::Failed(err.user_message()),
        }
    }
}

impl<T: Default> Section<T> {
    /// Ready data, or an empty value for a failed section.
    pub fn or_empty(&self) -> T
    where
        T: Clone,
    {
        self.ready().cloned().unwrap_or_default()
    }
}

/// Result of a controller operation: data to render, or a navigation away from the
/// dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Done(T),
    Redirect(Redirect),
}

impl<T> Outcome<T> {
    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Outcome::Redirect(redirect) => Some(redirect),
            Outcome::Done(_) => None,
        }
    }
}

/// What a fire-and-refresh mutation hands back: the server's message and the re-fetched list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReceipt<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub refreshed: Section<T>,
}

pub(crate) fn rejected<T>(result: &Result<T, ApiError>) -> bool {
    matches!(result, Err(err) if err.is_auth_failure())
}

/// Clears the role's session after the backend rejected its token and points back to the
/// role's sign-in page.
pub(crate) async fn expire(client: &ClientState, role: Role) -> Result<Redirect, ApiError> {
    tracing::warn!(role = %role, "Backend rejected session token; signing out");
    client.store().clear_role(role).await?;
    Ok(Redirect::now(Route::sign_in_for(role)))
}

/// Runs a mutation followed by a refresh of the affected list. A 401/403 from either call
/// expires the session; any other mutation error is returned as is.
pub(crate) async fn mutate_then_refresh<T, M, R>(
    client: &ClientState,
    role: Role,
    mutation: M,
    refresh: impl FnOnce() -> R,
) -> Result<Outcome<ActionReceipt<T>>, ApiError>
where
    M: std::future::Future<Output = Result<Option<String>, ApiError>>,
    R: std::future::Future<Output = Result<T, ApiError>>,
{
    let message = match mutation.await {
        Ok(message) => message,
        Err(err) if err.is_auth_failure() => return Ok(Outcome::Redirect(expire(client, role).await?)),
        Err(err) => return Err(err),
    };

    let refreshed = refresh().await;
    if rejected(&refreshed) {
        return Ok(Outcome::Redirect(expire(client, role).await?));
    }
    Ok(Outcome::Done(ActionReceipt { message, refreshed: refreshed.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_from_result() {
        let ok: Section<Vec<u8>> = Ok(vec![1]).into();
        assert_eq!(ok.ready(), Some(&vec![1]));

        let failed: Section<Vec<u8>> =
            Err(ApiError::Server { status: 500, message: "Database down".into() }).into();
        assert_eq!(failed, Section::Failed("Database down".into()));
        assert!(failed.or_empty().is_empty());
    }

    #[test]
    fn only_auth_failures_are_rejections() {
        let unauthorized: Result<(), ApiError> =
            Err(ApiError::Unauthorized { status: 401, message: "expired".into() });
        let server: Result<(), ApiError> = Err(ApiError::Server { status: 500, message: "x".into() });
        assert!(rejected(&unauthorized));
        assert!(!rejected(&server));
        assert!(!rejected(&Ok::<(), ApiError>(())));
    }

    #[test]
    fn section_serializes_with_status_tag() {
        let value = serde_json::to_value(Section::Ready(vec!["a"])).expect("json");
        assert_eq!(value, serde_json::json!({"status": "ready", "data": ["a"]}));
    }
}
