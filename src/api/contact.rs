use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;

#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ApiClient {
    pub(crate) async fn contact(&self, request: &ContactRequest) -> Result<Option<String>, ApiError> {
        let body = self.send_json(&Endpoint::Contact, None, Some(request)).await?;
        Ok(normalize::message(&body))
    }
}
