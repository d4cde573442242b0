pub mod config;
pub mod state;
pub(crate) mod telemetry;
pub(crate) mod time;
