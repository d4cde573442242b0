//! Persisted session state shared by the workflows and dashboard controllers.
//!
//! Reads are public. Writes are crate-private so every mutation goes through a workflow or
//! controller operation.

mod store;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::schemas::{PaymentDraft, PaymentRecord, Role, Session, SignupDraft, UserProfile};

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Token,
    UserId,
    Role,
    AdminToken,
    QaoToken,
    QaoUser,
    User,
    PaymentData,
    LastPayment,
    SignupDraft,
}

impl StorageKey {
    pub const ALL: [StorageKey; 10] = [
        StorageKey::Token,
        StorageKey::UserId,
        StorageKey::Role,
        StorageKey::AdminToken,
        StorageKey::QaoToken,
        StorageKey::QaoUser,
        StorageKey::User,
        StorageKey::PaymentData,
        StorageKey::LastPayment,
        StorageKey::SignupDraft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::UserId => "userId",
            StorageKey::Role => "role",
            StorageKey::AdminToken => "adminToken",
            StorageKey::QaoToken => "qaoToken",
            StorageKey::QaoUser => "qaoUser",
            StorageKey::User => "user",
            StorageKey::PaymentData => "paymentData",
            StorageKey::LastPayment => "lastPayment",
            StorageKey::SignupDraft => "signupDraft",
        }
    }

    /// Keys removed when the given role logs out or its token is rejected.
    pub fn session_keys(role: Role) -> &'static [StorageKey] {
        match role {
            Role::Student | Role::Teacher => {
                &[StorageKey::Token, StorageKey::UserId, StorageKey::Role, StorageKey::User]
            }
            Role::Admin => {
                &[StorageKey::AdminToken, StorageKey::UserId, StorageKey::Role, StorageKey::User]
            }
            Role::Qao => &[StorageKey::QaoToken, StorageKey::QaoUser],
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn text(&self, key: StorageKey) -> Option<String> {
        self.backend.get(key.as_str()).await.filter(|value| !value.is_empty())
    }

    /// Typed read. A value that no longer matches `T` is logged and treated as absent.
    pub async fn json<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = self.text(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key = key.as_str(), error = %err, "Ignoring unreadable session value");
                None
            }
        }
    }

    pub(crate) async fn set_text(
        &self,
        key: StorageKey,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.backend.set(key.as_str(), value.into()).await
    }

    pub(crate) async fn set_json<T: Serialize>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        self.backend.set(key.as_str(), text).await
    }

    pub(crate) async fn clear(&self, keys: &[StorageKey]) -> Result<(), StoreError> {
        let names: Vec<&str> = keys.iter().map(|key| key.as_str()).collect();
        self.backend.remove(&names).await
    }

    /// The student, teacher or admin session. Present only when token, user id and a
    /// parseable role are all stored.
    pub async fn session(&self) -> Option<Session> {
        let role = self.text(StorageKey::Role).await?.parse::<Role>().ok()?;
        let token_key = match role {
            Role::Admin => StorageKey::AdminToken,
            _ => StorageKey::Token,
        };
        let token = self.text(token_key).await?;
        let user_id = self.text(StorageKey::UserId).await?;
        Some(Session { token, user_id, role })
    }

    pub(crate) async fn save_session(
        &self,
        session: &Session,
        user: Option<&UserProfile>,
    ) -> Result<(), StoreError> {
        let token_key = match session.role {
            Role::Admin => StorageKey::AdminToken,
            _ => StorageKey::Token,
        };
        self.set_text(token_key, session.token.clone()).await?;
        self.set_text(StorageKey::UserId, session.user_id.clone()).await?;
        self.set_text(StorageKey::Role, session.role.as_str()).await?;
        if let Some(user) = user {
            self.set_json(StorageKey::User, user).await?;
        }
        Ok(())
    }

    pub(crate) async fn clear_role(&self, role: Role) -> Result<(), StoreError> {
        self.clear(StorageKey::session_keys(role)).await
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.json(StorageKey::User).await
    }

    pub async fn qao_token(&self) -> Option<String> {
        self.text(StorageKey::QaoToken).await
    }

    pub async fn qao_user(&self) -> Option<Value> {
        self.json(StorageKey::QaoUser).await
    }

    pub async fn signup_draft(&self) -> Option<SignupDraft> {
        self.json(StorageKey::SignupDraft).await
    }

    pub async fn payment_draft(&self) -> Option<PaymentDraft> {
        self.json(StorageKey::PaymentData).await
    }

    pub async fn last_payment(&self) -> Option<PaymentRecord> {
        self.json(StorageKey::LastPayment).await
    }

    /// Raw key/value listing used by `educonnect session show`.
    pub async fn snapshot(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        for key in StorageKey::ALL {
            if let Some(value) = self.text(key).await {
                entries.push((key.as_str(), value));
            }
        }
        entries
    }
}
