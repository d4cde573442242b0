use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Settings {
    pub(super) runtime: RuntimeSettings,
    pub(super) api: ApiSettings,
    pub(super) storage: StorageSettings,
    pub(super) signup: SignupSettings,
    pub(super) payment: PaymentSettings,
    pub(super) telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub(crate) base_url: String,
    /// Zero disables the per-request timeout.
    pub(crate) timeout_seconds: u64,
    pub(crate) connect_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub(crate) store_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SignupSettings {
    pub(crate) student_min_subjects: usize,
    pub(crate) student_max_subjects: usize,
    pub(crate) notice_redirect_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub(crate) redirect_delay_ms: u64,
    pub(crate) max_upload_size_mb: u64,
    pub(crate) allowed_image_extensions: Vec<String>,
    pub(crate) momo_number: String,
    pub(crate) momo_name: String,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub(crate) environment: Environment,
    pub(crate) strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Test => "test",
        }
    }

    pub(super) fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("insecure api base url in strict mode: {0}")]
    InsecureBaseUrl(String),
}

impl PaymentSettings {
    pub(crate) fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}
