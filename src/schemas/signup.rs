use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schemas::de;
use crate::schemas::session::Role;

/// Reference data scoped to a (curriculum, package, grade) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default, deserialize_with = "de::id_string")]
    pub id: String,
    #[serde(alias = "subjectName", default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::amount")]
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupDraft {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    pub grade: Option<String>,
    #[validate(length(min = 1, message = "Curriculum is required"))]
    pub curriculum: String,
    #[validate(length(min = 1, message = "Package is required"))]
    pub package: String,
    pub selected_subject_ids: Vec<String>,
    /// Cached display value; the workflow recomputes it from the loaded subjects.
    pub total_amount: f64,
    pub duration: Option<String>,
    pub role: Role,
}

impl SignupDraft {
    pub fn new(role: Role) -> Self {
        Self { role, ..Self::default() }
    }

    /// Key used in `/api/subjects/by-package/:packageKey`: trimmed, upper-cased, inner
    /// whitespace collapsed into single dashes ("ges vc" -> "GES-VC").
    pub fn package_key(&self) -> String {
        normalize_package_key(&self.package)
    }
}

pub fn normalize_package_key(package: &str) -> String {
    package.split_whitespace().collect::<Vec<_>>().join("-").to_ascii_uppercase()
}

/// Sum of prices of the selected ids that exist in `subjects`; unknown ids contribute 0.
pub fn total_for(subjects: &[Subject], selected_ids: &[String]) -> f64 {
    subjects
        .iter()
        .filter(|subject| selected_ids.iter().any(|id| id == &subject.id))
        .map(|subject| subject.price)
        .sum()
}
