mod parsing;
mod settings;
mod types;

pub use types::{
    ApiSettings, ConfigError, Environment, PaymentSettings, RuntimeSettings, Settings,
    SignupSettings, StorageSettings, TelemetrySettings,
};
