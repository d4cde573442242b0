use thiserror::Error;

use crate::session::StoreError;

/// Every failure an operation can surface to a user. Validation errors are raised before
/// any network call; the rest describe how the backend exchange went wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server error (status {status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response (status {status}): {detail}")]
    Protocol { status: u16, detail: String },
    #[error("not authorized (status {status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("response is missing {0}")]
    MissingData(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text shown inline next to a form or dashboard section.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            ApiError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Protocol { .. } => "Server did not respond correctly".to_string(),
            ApiError::Unauthorized { message, .. } => message.clone(),
            ApiError::MissingData(what) => format!("Login failed: {what} missing in response"),
            ApiError::Store(_) => "Could not save your session on this device".to_string(),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. }
            | ApiError::Protocol { status, .. }
            | ApiError::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .collect();
        messages.sort();
        ApiError::Validation(messages.join("; "))
    }
}
