use serde::Serialize;

use crate::api::validation::require;
use crate::api::{ApiError, NewAssignment, NewBroadcast};
use crate::core::state::ClientState;
use crate::dashboard::{expire, mutate_then_refresh, rejected, ActionReceipt, Outcome, Section};
use crate::schemas::{
    Activity, Assignment, Broadcast, Message, Role, Session, StudentSummary, Subject, UserProfile,
};
use crate::workflow::{Redirect, Route};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDashboard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    pub subjects: Section<Vec<Subject>>,
    pub students: Section<Vec<StudentSummary>>,
    pub assignments: Section<Vec<Assignment>>,
    pub broadcasts: Section<Vec<Broadcast>>,
    pub messages: Section<Vec<Message>>,
    pub activity: Vec<Activity>,
    pub notifications: Vec<String>,
}

/// Broadcasts and messages merged newest first. Entries without a timestamp sort last.
pub fn activity_feed(broadcasts: &[Broadcast], messages: &[Message]) -> Vec<Activity> {
    let mut feed: Vec<Activity> = broadcasts
        .iter()
        .map(Activity::from)
        .chain(messages.iter().map(Activity::from))
        .collect();
    feed.sort_by(|left, right| right.time.cmp(&left.time));
    feed
}

/// Fields a teacher fills in to post an assignment.
#[derive(Debug, Clone, Default)]
pub struct AssignmentInput {
    pub title: String,
    pub description: String,
    pub class_name: String,
    pub subject_id: String,
}

async fn teacher_session(client: &ClientState) -> Option<Session> {
    client.store().session().await.filter(|session| session.role == Role::Teacher)
}

pub async fn load(client: &ClientState) -> Result<Outcome<TeacherDashboard>, ApiError> {
    let Some(session) = teacher_session(client).await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::Login)));
    };
    let api = client.api();
    let (token, id) = (session.token.as_str(), session.user_id.as_str());

    let (subjects, students, assignments, broadcasts, messages) = tokio::join!(
        api.teacher_subjects(id, token),
        api.teacher_students(id, token),
        api.teacher_assignments(id, token),
        api.teacher_broadcasts(id, token),
        api.teacher_messages(id, token),
    );

    if rejected(&subjects)
        || rejected(&students)
        || rejected(&assignments)
        || rejected(&broadcasts)
        || rejected(&messages)
    {
        return Ok(Outcome::Redirect(expire(client, Role::Teacher).await?));
    }

    let broadcasts: Section<Vec<Broadcast>> = broadcasts.into();
    let messages: Section<Vec<Message>> = messages.into();
    let activity = activity_feed(&broadcasts.or_empty(), &messages.or_empty());
    let user = client.store().user().await;
    let name = user.as_ref().map(UserProfile::display_name).unwrap_or("Teacher").to_string();

    Ok(Outcome::Done(TeacherDashboard {
        user,
        subjects: subjects.into(),
        students: students.into(),
        assignments: assignments.into(),
        broadcasts,
        messages,
        activity,
        notifications: vec![format!("Welcome back, {name}!")],
    }))
}

pub async fn send_broadcast(
    client: &ClientState,
    subject_id: &str,
    message: &str,
) -> Result<Outcome<ActionReceipt<Vec<Broadcast>>>, ApiError> {
    if subject_id.trim().is_empty() || message.trim().is_empty() {
        return Err(ApiError::validation("Please complete all fields"));
    }
    let Some(session) = teacher_session(client).await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::Login)));
    };
    let api = client.api();
    let (token, id) = (session.token.as_str(), session.user_id.as_str());

    let broadcast = NewBroadcast {
        teacher_id: id.to_string(),
        subject_id: subject_id.trim().to_string(),
        message: message.trim().to_string(),
    };
    mutate_then_refresh(
        client,
        Role::Teacher,
        async {
            api.send_broadcast(&broadcast, token).await?;
            Ok::<_, ApiError>(Some("Broadcast sent".to_string()))
        },
        || api.teacher_broadcasts(id, token),
    )
    .await
}

pub async fn post_assignment(
    client: &ClientState,
    input: AssignmentInput,
) -> Result<Outcome<ActionReceipt<Vec<Assignment>>>, ApiError> {
    require(&input.title, "Complete all fields")?;
    require(&input.description, "Complete all fields")?;
    require(&input.subject_id, "Complete all fields")?;

    let Some(session) = teacher_session(client).await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::Login)));
    };
    let api = client.api();
    let (token, id) = (session.token.as_str(), session.user_id.as_str());

    let assignment = NewAssignment {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        class_name: input.class_name.trim().to_string(),
        subject_id: input.subject_id.trim().to_string(),
        teacher_id: id.to_string(),
    };
    mutate_then_refresh(
        client,
        Role::Teacher,
        async {
            api.post_assignment(&assignment, token).await?;
            Ok::<_, ApiError>(Some("Assignment posted".to_string()))
        },
        || api.teacher_assignments(id, token),
    )
    .await
}

pub async fn reply(
    client: &ClientState,
    message_id: &str,
    text: &str,
) -> Result<Outcome<ActionReceipt<Vec<Message>>>, ApiError> {
    require(message_id, "Choose a message to reply to")?;
    require(text, "Reply cannot be empty")?;

    let Some(session) = teacher_session(client).await else {
        return Ok(Outcome::Redirect(Redirect::now(Route::Login)));
    };
    let api = client.api();
    let (token, id) = (session.token.as_str(), session.user_id.as_str());

    mutate_then_refresh(
        client,
        Role::Teacher,
        async {
            api.reply_to_message(message_id.trim(), id, text.trim(), token).await?;
            Ok::<_, ApiError>(Some("Reply sent".to_string()))
        },
        || api.teacher_messages(id, token),
    )
    .await
}
