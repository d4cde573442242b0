use serde::Serialize;
use serde_json::Value;

use crate::api::validation::require;
use crate::api::{ApiError, OutgoingMessage};
use crate::core::state::ClientState;
use crate::dashboard::{expire, mutate_then_refresh, rejected, ActionReceipt, Outcome, Section};
use crate::schemas::{Kpi, Message, Notification, Resource, Role, TeacherSummary};
use crate::workflow::{Redirect, Route};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaoDashboard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officer: Option<Value>,
    pub teachers: Section<Vec<TeacherSummary>>,
    pub resources: Section<Vec<Resource>>,
    pub kpis: Section<Vec<Kpi>>,
    pub inbox: Section<Vec<Message>>,
    pub notifications: Section<Vec<Notification>>,
}

pub async fn load(client: &ClientState) -> Result<Outcome<QaoDashboard>, ApiError> {
    let Some(token) = client.store().qao_token().await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::QaoAccess)));
    };
    let api = client.api();

    let (teachers, resources, kpis, inbox, notifications) = tokio::join!(
        api.qao_teachers(&token),
        api.qao_resources(&token),
        api.qao_kpis(&token),
        api.qao_inbox(&token),
        api.qao_notifications(&token),
    );

    if rejected(&teachers)
        || rejected(&resources)
        || rejected(&kpis)
        || rejected(&inbox)
        || rejected(&notifications)
    {
        return Ok(Outcome::Redirect(expire(client, Role::Qao).await?));
    }

    Ok(Outcome::Done(QaoDashboard {
        officer: client.store().qao_user().await,
        teachers: teachers.into(),
        resources: resources.into(),
        kpis: kpis.into(),
        inbox: inbox.into(),
        notifications: notifications.into(),
    }))
}

pub async fn send_message(
    client: &ClientState,
    message: OutgoingMessage,
) -> Result<Outcome<ActionReceipt<Vec<Message>>>, ApiError> {
    require(&message.receiver, "Please fill in all fields.")?;
    require(&message.subject, "Please fill in all fields.")?;
    require(&message.message, "Please fill in all fields.")?;

    let Some(token) = client.store().qao_token().await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::QaoAccess)));
    };
    let api = client.api();

    mutate_then_refresh(
        client,
        Role::Qao,
        async {
            api.send_qao_message(&message, &token).await?;
            Ok::<_, ApiError>(Some("Message sent successfully!".to_string()))
        },
        || api.qao_inbox(&token),
    )
    .await
}

/// Approves or rejects a resource, then reloads the resource list rather than patching it.
pub async fn review_resource(
    client: &ClientState,
    resource_id: &str,
    approved: bool,
) -> Result<Outcome<ActionReceipt<Vec<Resource>>>, ApiError> {
    require(resource_id, "Choose a resource to review")?;

    let Some(token) = client.store().qao_token().await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::QaoAccess)));
    };
    let api = client.api();

    mutate_then_refresh(
        client,
        Role::Qao,
        async {
            api.review_resource(resource_id.trim(), approved, &token).await?;
            let verdict = if approved { "Resource approved" } else { "Resource rejected" };
            Ok::<_, ApiError>(Some(verdict.to_string()))
        },
        || api.qao_resources(&token),
    )
    .await
}
