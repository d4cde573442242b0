use std::env;
use std::path::PathBuf;

use super::types::{ConfigError, Environment};

const STORE_DIR: &str = ".educonnect";
const STORE_FILE: &str = "session.json";

pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

pub(super) fn parse_u64(field: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

pub(super) fn parse_usize(field: &'static str, value: String) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidValue { field, value })
}

pub(super) fn parse_string_list(value: Option<String>, defaults: &[&str]) -> Vec<String> {
    match value {
        Some(raw) => raw
            .split(',')
            .map(|item| item.trim().to_ascii_lowercase())
            .filter(|item| !item.is_empty())
            .collect(),
        None => defaults.iter().map(|item| item.to_string()).collect(),
    }
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

pub(super) fn parse_environment(value: Option<String>) -> Environment {
    match value.as_deref().map(|item| item.to_lowercase()) {
        Some(ref val) if val == "production" || val == "prod" => Environment::Production,
        Some(ref val) if val == "staging" => Environment::Staging,
        Some(ref val) if val == "test" || val == "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

pub(super) fn parse_base_url(value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/').to_string();
    match reqwest::Url::parse(&trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed),
        _ => Err(ConfigError::InvalidBaseUrl(value)),
    }
}

pub(super) fn default_store_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(STORE_DIR).join(STORE_FILE),
        None => PathBuf::from(STORE_DIR).join(STORE_FILE),
    }
}

pub(super) fn is_supported_image_extension(extension: &str) -> bool {
    matches!(extension, "jpg" | "jpeg" | "png" | "webp" | "gif")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("YES"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Staging);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[test]
    fn parse_base_url_strips_trailing_slash() {
        let parsed = parse_base_url("https://api.example.com/".to_string()).expect("url");
        assert_eq!(parsed, "https://api.example.com");
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url".to_string()).is_err());
        assert!(parse_base_url("ftp://files.example.com".to_string()).is_err());
    }

    #[test]
    fn string_list_lowercases_and_drops_blanks() {
        let parsed = parse_string_list(Some("PNG, ,jpg".to_string()), &["gif"]);
        assert_eq!(parsed, vec!["png".to_string(), "jpg".to_string()]);
        assert_eq!(parse_string_list(None, &["gif"]), vec!["gif".to_string()]);
    }

    #[test]
    fn store_path_prefers_home() {
        let path = default_store_path(Some("/home/ama".to_string()));
        assert_eq!(path, PathBuf::from("/home/ama/.educonnect/session.json"));
        assert_eq!(default_store_path(None), PathBuf::from(".educonnect/session.json"));
    }
}
