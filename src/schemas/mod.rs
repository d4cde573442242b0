pub mod dashboard;
pub(crate) mod de;
pub mod payment;
pub mod session;
pub mod signup;
pub mod user;

pub use dashboard::{
    Activity, ActivityKind, Assignment, Broadcast, Kpi, Message, Notification, Resource,
    StudentSummary, TeacherSummary,
};
pub use payment::{PaymentDraft, PaymentRecord, PaymentStatus, PaymentUser};
pub use session::{AccountKind, Role, Session};
pub use signup::{SignupDraft, Subject};
pub use user::UserProfile;
