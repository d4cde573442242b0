//! User-driven flows that write the session store: authentication, registration and the
//! payment step.

pub mod auth;
pub mod navigation;
pub mod payment;
pub mod signup;

pub use navigation::{Redirect, Route};
pub use payment::{PaymentFlow, PaymentInstructions, PaymentOutcome};
pub use signup::{SignupField, SignupFlow, SignupOutcome, SignupState, SubjectBounds, SubjectQuery};
