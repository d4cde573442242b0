use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;
use crate::schemas::Subject;

impl ApiClient {
    /// Subjects offered for a package at a grade. Callers pass the normalized package key.
    pub(crate) async fn subjects_by_package(
        &self,
        package_key: &str,
        grade: &str,
    ) -> Result<Vec<Subject>, ApiError> {
        let endpoint = Endpoint::SubjectsByPackage {
            package_key: package_key.to_string(),
            grade: grade.to_string(),
        };
        let body = self.get(&endpoint, None).await?;
        Ok(normalize::list(&body, &["subjects"]))
    }
}
