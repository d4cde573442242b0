//! Login, password recovery, the QAO access gate and logout.

use serde::Serialize;

use crate::api::validation::require;
use crate::api::ApiError;
use crate::core::state::ClientState;
use crate::schemas::{AccountKind, Role, Session, UserProfile};
use crate::session::StorageKey;
use crate::workflow::navigation::{Redirect, Route};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub redirect: Redirect,
}

fn account_kind(role: Role) -> Result<AccountKind, ApiError> {
    AccountKind::try_from(role).map_err(|role| {
        ApiError::validation(format!("{role} accounts do not sign in with email and password"))
    })
}

/// Student or teacher login. A rejected password is reported inline; only a complete
/// response (account record plus token) writes the session.
pub async fn login(
    client: &ClientState,
    role: Role,
    email: &str,
    password: &str,
) -> Result<AuthOutcome, ApiError> {
    let kind = account_kind(role)?;
    require(email, "Email is required")?;
    require(password, "Password is required")?;

    let grant = match client.api().login(kind, email.trim(), password).await {
        Ok(grant) => grant,
        Err(ApiError::Unauthorized { status, message }) => {
            return Err(ApiError::Server { status, message })
        }
        Err(err) => return Err(err),
    };

    // The role chosen on the form decides the account collection, so it also decides the
    // session role.
    let mut user = grant.user;
    user.role = kind.role();
    let session = Session { token: grant.token, user_id: user.id.clone(), role: user.role };
    client.store().save_session(&session, Some(&user)).await?;

    tracing::info!(role = %session.role, user_id = %session.user_id, "Logged in");
    Ok(AuthOutcome {
        redirect: Redirect::now(Route::dashboard_for(session.role)),
        user: Some(user),
        message: None,
    })
}

pub async fn forget_password(
    client: &ClientState,
    role: Role,
    email: &str,
) -> Result<AuthOutcome, ApiError> {
    let kind = account_kind(role)?;
    require(email, "Please enter your email address")?;

    let message = client.api().forget_password(kind, email.trim()).await?;
    Ok(AuthOutcome {
        user: None,
        message: Some(message.unwrap_or_else(|| "Password reset link sent! Check your email.".into())),
        redirect: Redirect::after(Route::Login, client.settings().notice_redirect_delay()),
    })
}

pub async fn reset_password(
    client: &ClientState,
    role: Role,
    reset_token: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<AuthOutcome, ApiError> {
    let kind = account_kind(role)?;
    require(reset_token, "Reset link is invalid")?;
    if new_password.is_empty() || confirm_password.is_empty() {
        return Err(ApiError::validation("Please fill in all fields"));
    }
    if new_password != confirm_password {
        return Err(ApiError::validation("Passwords do not match"));
    }

    let message = client.api().reset_password(kind, reset_token.trim(), new_password).await?;
    Ok(AuthOutcome {
        user: None,
        message: Some(
            message.unwrap_or_else(|| "Password reset successful! You can now log in.".into()),
        ),
        redirect: Redirect::now(Route::Login),
    })
}

pub async fn qao_access(client: &ClientState, code: &str) -> Result<AuthOutcome, ApiError> {
    require(code, "Please enter your QAO access code")?;

    let grant = match client.api().qao_access(code.trim()).await {
        Ok(grant) => grant,
        Err(ApiError::Unauthorized { status, message }) => {
            return Err(ApiError::Server { status, message })
        }
        Err(err) => return Err(err),
    };

    let store = client.store();
    store.set_text(StorageKey::QaoToken, grant.token).await?;
    match &grant.user {
        Some(user) => store.set_json(StorageKey::QaoUser, user).await?,
        None => store.clear(&[StorageKey::QaoUser]).await?,
    }

    tracing::info!("QAO access granted");
    Ok(AuthOutcome { user: None, message: None, redirect: Redirect::now(Route::QaoDashboard) })
}

pub async fn admin_login(
    client: &ClientState,
    email: &str,
    password: &str,
    admin_code: Option<&str>,
) -> Result<AuthOutcome, ApiError> {
    require(email, "Email is required")?;
    require(password, "Password is required")?;
    let admin_code = admin_code.map(str::trim).filter(|code| !code.is_empty());

    let grant = match client.api().admin_login(email.trim(), password, admin_code).await {
        Ok(grant) => grant,
        Err(ApiError::Unauthorized { status, message }) => {
            return Err(ApiError::Server { status, message })
        }
        Err(err) => return Err(err),
    };

    let session = Session { token: grant.token, user_id: grant.user.id.clone(), role: Role::Admin };
    client.store().save_session(&session, Some(&grant.user)).await?;

    tracing::info!(user_id = %session.user_id, "Admin logged in");
    Ok(AuthOutcome {
        user: Some(grant.user),
        message: None,
        redirect: Redirect::now(Route::AdminDashboard),
    })
}

pub async fn logout(client: &ClientState, role: Role) -> Result<Redirect, ApiError> {
    client.store().clear_role(role).await?;
    tracing::info!(role = %role, "Logged out");
    Ok(Redirect::now(Route::sign_in_for(role)))
}
