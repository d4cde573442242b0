use std::path::PathBuf;
use std::time::Duration;

use super::parsing::{
    default_store_path, env_optional, env_or_default, is_supported_image_extension, parse_base_url,
    parse_bool, parse_environment, parse_string_list, parse_u64, parse_usize,
};
use super::types::{
    ApiSettings, ConfigError, Environment, PaymentSettings, RuntimeSettings, Settings, SignupSettings,
    StorageSettings, TelemetrySettings,
};

const DEFAULT_BASE_URL: &str = "https://studiesmasters-backend-2.onrender.com";
const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = parse_environment(
            env_optional("EDUCONNECT_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config = env_optional("EDUCONNECT_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false)
            || environment.is_production();

        let base_url = parse_base_url(env_or_default("EDUCONNECT_API_BASE_URL", DEFAULT_BASE_URL))?;
        let timeout_seconds = parse_u64(
            "EDUCONNECT_HTTP_TIMEOUT_SECONDS",
            env_or_default("EDUCONNECT_HTTP_TIMEOUT_SECONDS", "0"),
        )?;
        let connect_timeout_seconds = parse_u64(
            "EDUCONNECT_HTTP_CONNECT_TIMEOUT_SECONDS",
            env_or_default("EDUCONNECT_HTTP_CONNECT_TIMEOUT_SECONDS", "20"),
        )?;

        let store_path = env_optional("EDUCONNECT_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_store_path(env_optional("HOME")));

        let student_min_subjects = parse_usize(
            "EDUCONNECT_STUDENT_MIN_SUBJECTS",
            env_or_default("EDUCONNECT_STUDENT_MIN_SUBJECTS", "2"),
        )?;
        let student_max_subjects = parse_usize(
            "EDUCONNECT_STUDENT_MAX_SUBJECTS",
            env_or_default("EDUCONNECT_STUDENT_MAX_SUBJECTS", "3"),
        )?;
        let notice_redirect_delay_ms = parse_u64(
            "EDUCONNECT_NOTICE_REDIRECT_DELAY_MS",
            env_or_default("EDUCONNECT_NOTICE_REDIRECT_DELAY_MS", "1200"),
        )?;

        let redirect_delay_ms = parse_u64(
            "EDUCONNECT_PAYMENT_REDIRECT_DELAY_MS",
            env_or_default("EDUCONNECT_PAYMENT_REDIRECT_DELAY_MS", "1500"),
        )?;
        let max_upload_size_mb = parse_u64(
            "EDUCONNECT_MAX_UPLOAD_SIZE_MB",
            env_or_default("EDUCONNECT_MAX_UPLOAD_SIZE_MB", "10"),
        )?;
        let allowed_image_extensions = parse_string_list(
            env_optional("EDUCONNECT_ALLOWED_IMAGE_EXTENSIONS"),
            DEFAULT_IMAGE_EXTENSIONS,
        );
        let momo_number = env_or_default("EDUCONNECT_MOMO_NUMBER", "0591586781");
        let momo_name = env_or_default("EDUCONNECT_MOMO_NAME", "DANIEL MENSAH WILLIAMS");

        let log_level = env_or_default("EDUCONNECT_LOG_LEVEL", "warn");
        let json = env_optional("EDUCONNECT_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { base_url, timeout_seconds, connect_timeout_seconds },
            storage: StorageSettings { store_path },
            signup: SignupSettings {
                student_min_subjects,
                student_max_subjects,
                notice_redirect_delay_ms,
            },
            payment: PaymentSettings {
                redirect_delay_ms,
                max_upload_size_mb,
                allowed_image_extensions,
                momo_number,
                momo_name,
            },
            telemetry: TelemetrySettings { log_level, json },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Points the client at a different backend, e.g. from a command-line flag.
    pub fn with_api_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.api.base_url = parse_base_url(base_url.to_string())?;
        self.validate()?;
        Ok(self)
    }

    /// Built-in defaults for a development environment. Reads no environment variables.
    pub fn defaults() -> Self {
        Self {
            runtime: RuntimeSettings { environment: Environment::Development, strict_config: false },
            api: ApiSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_seconds: 0,
                connect_timeout_seconds: 20,
            },
            storage: StorageSettings { store_path: default_store_path(None) },
            signup: SignupSettings {
                student_min_subjects: 2,
                student_max_subjects: 3,
                notice_redirect_delay_ms: 1200,
            },
            payment: PaymentSettings {
                redirect_delay_ms: 1500,
                max_upload_size_mb: 10,
                allowed_image_extensions: DEFAULT_IMAGE_EXTENSIONS
                    .iter()
                    .map(|extension| extension.to_string())
                    .collect(),
                momo_number: "0591586781".to_string(),
                momo_name: "DANIEL MENSAH WILLIAMS".to_string(),
            },
            telemetry: TelemetrySettings { log_level: "warn".to_string(), json: false },
        }
    }

    #[cfg(test)]
    pub(crate) fn for_base_url(base_url: &str) -> Self {
        let mut settings = Self::defaults();
        settings.runtime.environment = Environment::Test;
        settings.api = ApiSettings {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds: 5,
            connect_timeout_seconds: 5,
        };
        settings
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.store_path = path.into();
        self
    }

    pub fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub fn storage(&self) -> &StorageSettings {
        &self.storage
    }

    pub fn signup(&self) -> &SignupSettings {
        &self.signup
    }

    pub fn payment(&self) -> &PaymentSettings {
        &self.payment
    }

    pub fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    pub(crate) fn payment_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.payment.redirect_delay_ms)
    }

    pub(crate) fn notice_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.signup.notice_redirect_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.signup.student_min_subjects == 0 {
            return Err(ConfigError::InvalidValue {
                field: "EDUCONNECT_STUDENT_MIN_SUBJECTS",
                value: self.signup.student_min_subjects.to_string(),
            });
        }
        if self.signup.student_max_subjects < self.signup.student_min_subjects {
            return Err(ConfigError::InvalidValue {
                field: "EDUCONNECT_STUDENT_MAX_SUBJECTS",
                value: self.signup.student_max_subjects.to_string(),
            });
        }

        if self.payment.allowed_image_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "EDUCONNECT_ALLOWED_IMAGE_EXTENSIONS",
                value: String::from("<empty>"),
            });
        }
        for extension in &self.payment.allowed_image_extensions {
            if !is_supported_image_extension(extension) {
                return Err(ConfigError::InvalidValue {
                    field: "EDUCONNECT_ALLOWED_IMAGE_EXTENSIONS",
                    value: extension.clone(),
                });
            }
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::InsecureBaseUrl(self.api.base_url.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn load_uses_defaults() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.signup().student_min_subjects, 2);
        assert_eq!(settings.signup().student_max_subjects, 3);
        assert_eq!(settings.payment_redirect_delay(), Duration::from_millis(1500));
        assert_eq!(settings.notice_redirect_delay(), Duration::from_millis(1200));
        assert_eq!(settings.api().timeout_seconds, 0);
        assert_eq!(settings.payment().momo_number, "0591586781");
    }

    #[tokio::test]
    async fn load_rejects_inverted_subject_bounds() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EDUCONNECT_STUDENT_MIN_SUBJECTS", "4");

        let result = Settings::load();
        std::env::remove_var("EDUCONNECT_STUDENT_MIN_SUBJECTS");

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "EDUCONNECT_STUDENT_MAX_SUBJECTS", .. })
        ));
    }

    #[tokio::test]
    async fn strict_mode_requires_https() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EDUCONNECT_STRICT_CONFIG", "1");
        std::env::set_var("EDUCONNECT_API_BASE_URL", "http://plain.example.com");

        let result = Settings::load();
        std::env::remove_var("EDUCONNECT_STRICT_CONFIG");
        std::env::remove_var("EDUCONNECT_API_BASE_URL");

        assert!(matches!(result, Err(ConfigError::InsecureBaseUrl(_))));
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EDUCONNECT_ALLOWED_IMAGE_EXTENSIONS", "png,bmp");

        let result = Settings::load();
        std::env::remove_var("EDUCONNECT_ALLOWED_IMAGE_EXTENSIONS");

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "EDUCONNECT_ALLOWED_IMAGE_EXTENSIONS", .. })
        ));
    }

    #[tokio::test]
    async fn base_url_override_is_validated() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();

        let settings = Settings::load().expect("settings");
        let settings = settings.with_api_base_url("http://127.0.0.1:9999/").expect("override");
        assert_eq!(settings.api().base_url, "http://127.0.0.1:9999");
        assert!(Settings::load().expect("settings").with_api_base_url("nope").is_err());
    }

    #[tokio::test]
    async fn defaults_ignore_the_environment() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EDUCONNECT_STUDENT_MAX_SUBJECTS", "5");

        let settings = Settings::defaults();
        std::env::remove_var("EDUCONNECT_STUDENT_MAX_SUBJECTS");

        assert_eq!(settings.signup().student_max_subjects, 3);
        assert_eq!(settings.api().base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.api().connect_timeout_seconds, 20);
    }
}
