//! Command-line front end. Every command prints one JSON document on stdout.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{ApiError, Attachment, AssignmentAnswer, OutgoingMessage};
use crate::core::config::{ConfigError, Settings};
use crate::core::state::ClientState;
use crate::dashboard::{qao, student, teacher};
use crate::schemas::Role;
use crate::support::{self, ContactForm};
use crate::workflow::{auth, PaymentFlow, PaymentInstructions, SignupField, SignupFlow};

/// EduConnect tutoring platform client
#[derive(Parser, Debug)]
#[command(name = "educonnect", version, about)]
pub struct Cli {
    /// Backend base URL, overrides EDUCONNECT_API_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Session store file, overrides EDUCONNECT_STORE_PATH
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn apply(&self, mut settings: Settings) -> Result<Settings, ConfigError> {
        if let Some(base_url) = &self.base_url {
            settings = settings.with_api_base_url(base_url)?;
        }
        if let Some(store) = &self.store {
            settings = settings.with_store_path(store.clone());
        }
        Ok(settings)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountArg {
    Student,
    Teacher,
}

impl From<AccountArg> for Role {
    fn from(value: AccountArg) -> Self {
        match value {
            AccountArg::Student => Role::Student,
            AccountArg::Teacher => Role::Teacher,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Student,
    Teacher,
    Qao,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Student => Role::Student,
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Qao => Role::Qao,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in as a student (parent) or teacher
    Login {
        #[arg(long, value_enum, default_value_t = AccountArg::Student)]
        role: AccountArg,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored session for a role
    Logout {
        #[arg(long, value_enum, default_value_t = RoleArg::Student)]
        role: RoleArg,
    },
    /// Request a password reset link
    ForgotPassword {
        #[arg(long, value_enum, default_value_t = AccountArg::Student)]
        role: AccountArg,
        #[arg(long)]
        email: String,
    },
    /// Set a new password using the token from the reset link
    ResetPassword {
        #[arg(long, value_enum, default_value_t = AccountArg::Student)]
        role: AccountArg,
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Unlock the QAO dashboard with an access code
    QaoAccess {
        #[arg(long)]
        code: String,
    },
    AdminLogin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        admin_code: Option<String>,
    },
    /// Multi-step registration; the draft persists between invocations
    Signup {
        #[command(subcommand)]
        action: SignupCommand,
    },
    /// Mobile-money payment for a freshly registered student
    Pay {
        #[command(subcommand)]
        action: PayCommand,
    },
    Student {
        #[command(subcommand)]
        action: Option<StudentCommand>,
    },
    Teacher {
        #[command(subcommand)]
        action: Option<TeacherCommand>,
    },
    Qao {
        #[command(subcommand)]
        action: Option<QaoCommand>,
    },
    /// Search the help articles; no query lists them all
    Faq {
        query: Option<String>,
    },
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
    /// Dump the persisted session keys
    Session,
}

#[derive(Subcommand, Debug)]
pub enum SignupCommand {
    /// Discard any draft and begin a new registration
    Start {
        #[arg(long, value_enum, default_value_t = AccountArg::Student)]
        role: AccountArg,
    },
    /// Set a form field: full-name, email, phone, password, duration, curriculum or package
    Set { field: String, value: String },
    /// Choose the grade and load its subjects
    Grade { grade: String },
    /// Select or deselect a subject by id
    Toggle { subject_id: String },
    Show,
    Submit,
}

#[derive(Subcommand, Debug)]
pub enum PayCommand {
    /// Show the pending payment and the mobile-money instructions
    Show,
    Submit {
        /// Screenshot of the mobile-money confirmation
        #[arg(long)]
        screenshot: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    SubmitAssignment {
        assignment_id: String,
        #[arg(long, conflicts_with = "file")]
        answer: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TeacherCommand {
    Broadcast {
        #[arg(long)]
        subject_id: String,
        #[arg(long)]
        message: String,
    },
    PostAssignment {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        class_name: String,
        #[arg(long)]
        subject_id: String,
    },
    Reply {
        message_id: String,
        #[arg(long)]
        text: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum QaoCommand {
    Message {
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    Approve { resource_id: String },
    Reject { resource_id: String },
}

fn render<T: Serialize>(value: &T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn signup_view(flow: &SignupFlow) -> anyhow::Result<Value> {
    let mut draft = serde_json::to_value(flow.draft())?;
    if let Some(password) = draft.get_mut("password") {
        if password.as_str().is_some_and(|value| !value.is_empty()) {
            *password = Value::String("********".to_string());
        }
    }
    Ok(json!({
        "state": flow.state(),
        "draft": draft,
        "subjects": flow.subjects(),
        "totalAmount": flow.total_amount(),
        "canSubmit": flow.can_submit(),
        "lastError": flow.last_error(),
    }))
}

async fn resume_signup(client: &ClientState) -> Result<SignupFlow, ApiError> {
    let Some(mut flow) = SignupFlow::load(client).await else {
        return Err(ApiError::validation("No signup in progress. Run `signup start` first."));
    };
    flow.ensure_subjects(client).await?;
    Ok(flow)
}

async fn signup(client: &ClientState, action: SignupCommand) -> anyhow::Result<Value> {
    match action {
        SignupCommand::Start { role } => {
            let flow = SignupFlow::start(client, role.into()).await?;
            signup_view(&flow)
        }
        SignupCommand::Set { field, value } => {
            let mut flow = resume_signup(client).await?;
            match field.trim().to_ascii_lowercase().as_str() {
                "curriculum" => flow.set_curriculum(value),
                "package" => flow.set_package(value),
                other => {
                    let field = other.parse::<SignupField>().map_err(ApiError::validation)?;
                    flow.set_field(field, value);
                }
            }
            flow.save(client).await?;
            signup_view(&flow)
        }
        SignupCommand::Grade { grade } => {
            let mut flow = resume_signup(client).await?;
            flow.select_grade(client, &grade).await?;
            signup_view(&flow)
        }
        SignupCommand::Toggle { subject_id } => {
            let mut flow = resume_signup(client).await?;
            flow.toggle(client, &subject_id).await?;
            signup_view(&flow)
        }
        SignupCommand::Show => signup_view(&resume_signup(client).await?),
        SignupCommand::Submit => {
            let mut flow = resume_signup(client).await?;
            render(&flow.submit(client).await?)
        }
    }
}

async fn pay(client: &ClientState, action: PayCommand) -> anyhow::Result<Value> {
    let flow = PaymentFlow::load(client).await?;
    match action {
        PayCommand::Show => Ok(json!({
            "payment": flow.draft(),
            "instructions": PaymentInstructions::from_settings(client.settings()),
        })),
        PayCommand::Submit { screenshot } => {
            let screenshot = Attachment::from_path(&screenshot).await?;
            render(&flow.submit(client, Some(screenshot)).await?)
        }
    }
}

async fn student_action(client: &ClientState, action: Option<StudentCommand>) -> anyhow::Result<Value> {
    match action {
        None => render(&student::load(client).await?),
        Some(StudentCommand::SubmitAssignment { assignment_id, answer, file }) => {
            let answer = match (answer, file) {
                (_, Some(path)) => AssignmentAnswer::File(Attachment::from_path(&path).await?),
                (Some(text), None) => AssignmentAnswer::Typed(text),
                (None, None) => {
                    return Err(ApiError::validation("Provide --answer or --file").into());
                }
            };
            render(&student::submit_assignment(client, &assignment_id, answer).await?)
        }
    }
}

async fn teacher_action(client: &ClientState, action: Option<TeacherCommand>) -> anyhow::Result<Value> {
    match action {
        None => render(&teacher::load(client).await?),
        Some(TeacherCommand::Broadcast { subject_id, message }) => {
            render(&teacher::send_broadcast(client, &subject_id, &message).await?)
        }
        Some(TeacherCommand::PostAssignment { title, description, class_name, subject_id }) => {
            let input = teacher::AssignmentInput { title, description, class_name, subject_id };
            render(&teacher::post_assignment(client, input).await?)
        }
        Some(TeacherCommand::Reply { message_id, text }) => {
            render(&teacher::reply(client, &message_id, &text).await?)
        }
    }
}

async fn qao_action(client: &ClientState, action: Option<QaoCommand>) -> anyhow::Result<Value> {
    match action {
        None => render(&qao::load(client).await?),
        Some(QaoCommand::Message { receiver, subject, message }) => {
            let message = OutgoingMessage { receiver, subject, message };
            render(&qao::send_message(client, message).await?)
        }
        Some(QaoCommand::Approve { resource_id }) => {
            render(&qao::review_resource(client, &resource_id, true).await?)
        }
        Some(QaoCommand::Reject { resource_id }) => {
            render(&qao::review_resource(client, &resource_id, false).await?)
        }
    }
}

pub async fn execute(client: &ClientState, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::Login { role, email, password } => {
            render(&auth::login(client, role.into(), &email, &password).await?)
        }
        Command::Logout { role } => render(&auth::logout(client, role.into()).await?),
        Command::ForgotPassword { role, email } => {
            render(&auth::forget_password(client, role.into(), &email).await?)
        }
        Command::ResetPassword { role, token, password, confirm } => {
            render(&auth::reset_password(client, role.into(), &token, &password, &confirm).await?)
        }
        Command::QaoAccess { code } => render(&auth::qao_access(client, &code).await?),
        Command::AdminLogin { email, password, admin_code } => {
            render(&auth::admin_login(client, &email, &password, admin_code.as_deref()).await?)
        }
        Command::Signup { action } => signup(client, action).await,
        Command::Pay { action } => pay(client, action).await,
        Command::Student { action } => student_action(client, action).await,
        Command::Teacher { action } => teacher_action(client, action).await,
        Command::Qao { action } => qao_action(client, action).await,
        Command::Faq { query } => render(&support::search_faqs(query.as_deref().unwrap_or(""))),
        Command::Contact { name, email, message } => {
            let message = support::send_contact(client, ContactForm { name, email, message }).await?;
            Ok(json!({ "message": message }))
        }
        Command::Session => {
            let entries: serde_json::Map<String, Value> = client
                .store()
                .snapshot()
                .await
                .into_iter()
                .map(|(key, value)| (key.to_string(), Value::String(value)))
                .collect();
            Ok(Value::Object(entries))
        }
    }
}
