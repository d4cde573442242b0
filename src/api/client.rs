use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;
use crate::core::config::Settings;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP transport to the backend. Holds no session state: callers pass the bearer token
/// they read from the session store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api = settings.api();
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if api.connect_timeout_seconds > 0 {
            builder = builder.connect_timeout(Duration::from_secs(api.connect_timeout_seconds));
        }
        if api.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(api.timeout_seconds));
        }
        let client = builder.build().context("Failed to build backend HTTP client")?;

        Ok(Self { client, base_url: api.base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let mut request = self.request(endpoint, token);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(endpoint, request).await
    }

    pub(crate) async fn get(&self, endpoint: &Endpoint, token: Option<&str>) -> Result<Value, ApiError> {
        self.send_json::<Value>(endpoint, token, None).await
    }

    pub(crate) async fn send_multipart(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
        form: Form,
    ) -> Result<Value, ApiError> {
        let request = self.request(endpoint, token).multipart(form);
        self.execute(endpoint, request).await
    }

    fn request(&self, endpoint: &Endpoint, token: Option<&str>) -> RequestBuilder {
        let request = self
            .client
            .request(endpoint.method(), self.url(endpoint))
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        match token.filter(|token| !token.is_empty()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, endpoint: &Endpoint, request: RequestBuilder) -> Result<Value, ApiError> {
        let name = endpoint.name();
        let result = match request.send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(raw_body) => interpret(status, &raw_body),
                    Err(err) => Err(ApiError::Network(err.to_string())),
                }
            }
            Err(err) => Err(ApiError::Network(err.to_string())),
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(ApiError::Network(_)) => "network_error",
            Err(ApiError::Unauthorized { .. }) => "unauthorized",
            Err(ApiError::Protocol { .. }) => "protocol_error",
            Err(_) => "server_error",
        };
        metrics::counter!("api_requests_total", "outcome" => outcome).increment(1);

        match &result {
            Ok(_) => tracing::debug!(endpoint = name, "Backend request succeeded"),
            Err(err) => tracing::warn!(endpoint = name, error = %err, "Backend request failed"),
        }

        result
    }
}

fn interpret(status: StatusCode, raw_body: &str) -> Result<Value, ApiError> {
    let parsed = if raw_body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(raw_body)
    };

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        let message = parsed
            .as_ref()
            .ok()
            .and_then(normalize::message)
            .unwrap_or_else(|| "Your session has expired. Please log in again.".to_string());
        return Err(ApiError::Unauthorized { status: status.as_u16(), message });
    }

    let parsed = parsed.map_err(|err| ApiError::Protocol {
        status: status.as_u16(),
        detail: format!("non-JSON body: {err}"),
    })?;

    if !status.is_success() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: normalize::error_message(&parsed),
        });
    }

    Ok(parsed)
}
