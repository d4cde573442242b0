//! Role-scoped REST client for the tutoring backend.

mod attachment;
mod auth;
mod client;
mod contact;
pub mod endpoints;
pub mod errors;
pub(crate) mod normalize;
mod payments;
mod qao;
mod students;
mod subjects;
mod teachers;
pub(crate) mod validation;

pub use attachment::Attachment;
pub use auth::{AuthGrant, QaoGrant, SignupReceipt};
pub use client::ApiClient;
pub use contact::ContactRequest;
pub use endpoints::Endpoint;
pub use errors::ApiError;
pub use payments::PaymentSubmission;
pub use qao::OutgoingMessage;
pub use students::AssignmentAnswer;
pub use teachers::{NewAssignment, NewBroadcast};
