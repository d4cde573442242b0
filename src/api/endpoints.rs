use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;

use crate::schemas::AccountKind;

/// One variant per backend intent. Identifiers are raw values; `path()` encodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login(AccountKind),
    ForgetPassword(AccountKind),
    ResetPassword { kind: AccountKind, token: String },
    Signup,
    AdminLogin,
    QaoAccess,

    SubjectsByPackage { package_key: String, grade: String },
    SubmitPayment,

    StudentProfile,
    StudentSubjects(String),
    StudentBroadcasts(String),
    StudentPayments(String),
    StudentAssignments(String),
    SubmitAssignment(String),

    TeacherSubjects(String),
    TeacherStudents(String),
    TeacherAssignments(String),
    TeacherBroadcasts(String),
    SendBroadcast,
    PostAssignment,
    TeacherMessages(String),
    ReplyMessage(String),

    QaoTeachers,
    QaoResources,
    QaoKpis,
    QaoInbox,
    QaoNotifications,
    ReviewResource(String),
    SendMessage,

    Contact,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Login(_)
            | Endpoint::ForgetPassword(_)
            | Endpoint::ResetPassword { .. }
            | Endpoint::Signup
            | Endpoint::AdminLogin
            | Endpoint::QaoAccess
            | Endpoint::SubmitPayment
            | Endpoint::SubmitAssignment(_)
            | Endpoint::SendBroadcast
            | Endpoint::PostAssignment
            | Endpoint::ReplyMessage(_)
            | Endpoint::SendMessage
            | Endpoint::Contact => Method::POST,
            Endpoint::ReviewResource(_) => Method::PUT,
            _ => Method::GET,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Login(kind) => format!("/api/{}/login", kind.collection()),
            Endpoint::ForgetPassword(kind) => {
                format!("/api/{}/forget-password", kind.collection())
            }
            Endpoint::ResetPassword { kind, token } => {
                format!("/api/{}/reset-password/{}", kind.collection(), encode_component(token))
            }
            Endpoint::Signup => "/api/auth/signup".to_string(),
            Endpoint::AdminLogin => "/api/admin/login".to_string(),
            Endpoint::QaoAccess => "/api/qao/access".to_string(),

            Endpoint::SubjectsByPackage { package_key, grade } => format!(
                "/api/subjects/by-package/{}?grade={}",
                encode_component(package_key),
                encode_component(grade)
            ),
            Endpoint::SubmitPayment => "/api/students/payments/submit".to_string(),

            Endpoint::StudentProfile => "/api/students/me".to_string(),
            Endpoint::StudentSubjects(id) => {
                format!("/api/students/{}/subjects", encode_component(id))
            }
            Endpoint::StudentBroadcasts(id) => {
                format!("/api/students/broadcasts/{}", encode_component(id))
            }
            Endpoint::StudentPayments(id) => {
                format!("/api/students/payments/{}", encode_component(id))
            }
            Endpoint::StudentAssignments(id) => {
                format!("/api/students/assignments/{}", encode_component(id))
            }
            Endpoint::SubmitAssignment(id) => {
                format!("/api/students/assignments/submit/{}", encode_component(id))
            }

            Endpoint::TeacherSubjects(id) => teacher_collection(id, "subjects"),
            Endpoint::TeacherStudents(id) => teacher_collection(id, "students"),
            Endpoint::TeacherAssignments(id) => teacher_collection(id, "assignments"),
            Endpoint::TeacherBroadcasts(id) => teacher_collection(id, "broadcasts"),
            Endpoint::SendBroadcast => "/api/teachers/broadcast".to_string(),
            Endpoint::PostAssignment => "/api/teachers/assignments".to_string(),
            Endpoint::TeacherMessages(id) => {
                format!("/api/messages/teacher/{}", encode_component(id))
            }
            Endpoint::ReplyMessage(id) => format!("/api/messages/reply/{}", encode_component(id)),

            Endpoint::QaoTeachers => "/api/qao/teachers".to_string(),
            Endpoint::QaoResources => "/api/qao/resources".to_string(),
            Endpoint::QaoKpis => "/api/qao/kpis".to_string(),
            Endpoint::QaoInbox => "/api/qao/inbox".to_string(),
            Endpoint::QaoNotifications => "/api/qao/notifications".to_string(),
            Endpoint::ReviewResource(id) => format!("/api/qao/resources/{}", encode_component(id)),
            Endpoint::SendMessage => "/api/messages".to_string(),

            Endpoint::Contact => "/api/contact".to_string(),
        }
    }

    /// Short stable label for logs and metrics.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Endpoint::Login(_) => "login",
            Endpoint::ForgetPassword(_) => "forget_password",
            Endpoint::ResetPassword { .. } => "reset_password",
            Endpoint::Signup => "signup",
            Endpoint::AdminLogin => "admin_login",
            Endpoint::QaoAccess => "qao_access",
            Endpoint::SubjectsByPackage { .. } => "subjects_by_package",
            Endpoint::SubmitPayment => "submit_payment",
            Endpoint::StudentProfile => "student_profile",
            Endpoint::StudentSubjects(_) => "student_subjects",
            Endpoint::StudentBroadcasts(_) => "student_broadcasts",
            Endpoint::StudentPayments(_) => "student_payments",
            Endpoint::StudentAssignments(_) => "student_assignments",
            Endpoint::SubmitAssignment(_) => "submit_assignment",
            Endpoint::TeacherSubjects(_) => "teacher_subjects",
            Endpoint::TeacherStudents(_) => "teacher_students",
            Endpoint::TeacherAssignments(_) => "teacher_assignments",
            Endpoint::TeacherBroadcasts(_) => "teacher_broadcasts",
            Endpoint::SendBroadcast => "send_broadcast",
            Endpoint::PostAssignment => "post_assignment",
            Endpoint::TeacherMessages(_) => "teacher_messages",
            Endpoint::ReplyMessage(_) => "reply_message",
            Endpoint::QaoTeachers => "qao_teachers",
            Endpoint::QaoResources => "qao_resources",
            Endpoint::QaoKpis => "qao_kpis",
            Endpoint::QaoInbox => "qao_inbox",
            Endpoint::QaoNotifications => "qao_notifications",
            Endpoint::ReviewResource(_) => "review_resource",
            Endpoint::SendMessage => "send_message",
            Endpoint::Contact => "contact",
        }
    }
}

fn teacher_collection(id: &str, collection: &str) -> String {
    format!("/api/teachers/{}/{collection}", encode_component(id))
}

/// `encodeURIComponent` set: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a path segment or query value; a space becomes `%20`, not `+`.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_query_encodes_grade_with_percent_twenty() {
        let endpoint = Endpoint::SubjectsByPackage {
            package_key: "GES-VC".to_string(),
            grade: "SHS 1".to_string(),
        };
        assert_eq!(endpoint.method(), Method::GET);
        assert_eq!(endpoint.path(), "/api/subjects/by-package/GES-VC?grade=SHS%201");
        assert!(endpoint.path().ends_with("by-package/GES-VC?grade=SHS%201"));
    }

    #[test]
    fn encoder_matches_uri_component_rules() {
        assert_eq!(encode_component("a b&c/d"), "a%20b%26c%2Fd");
        assert_eq!(encode_component("it's(ok)!*~"), "it's(ok)!*~");
        assert_eq!(encode_component("Gh₵"), "Gh%E2%82%B5");
    }

    #[test]
    fn account_routes_follow_kind() {
        assert_eq!(Endpoint::Login(AccountKind::Teacher).path(), "/api/teachers/login");
        assert_eq!(
            Endpoint::ForgetPassword(AccountKind::Student).path(),
            "/api/students/forget-password"
        );
        assert_eq!(
            Endpoint::ResetPassword { kind: AccountKind::Student, token: "abc/123".into() }.path(),
            "/api/students/reset-password/abc%2F123"
        );
    }

    #[test]
    fn mutation_methods() {
        assert_eq!(Endpoint::ReviewResource("r1".into()).method(), Method::PUT);
        assert_eq!(Endpoint::ReplyMessage("m1".into()).method(), Method::POST);
        assert_eq!(Endpoint::TeacherMessages("t1".into()).method(), Method::GET);
        assert_eq!(Endpoint::TeacherStudents("t1".into()).path(), "/api/teachers/t1/students");
    }
}
