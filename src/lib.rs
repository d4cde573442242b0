pub mod api;
pub mod cli;
pub mod core;
pub mod dashboard;
pub mod schemas;
pub mod session;
pub mod support;
pub mod workflow;

#[cfg(test)]
mod test_support;

use clap::Parser;

use crate::api::ApiError;
use crate::cli::Cli;
use crate::core::{config::Settings, state::ClientState, telemetry};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = cli.apply(Settings::load()?)?;
    telemetry::init_tracing(&settings)?;

    tracing::debug!(
        base_url = %settings.api().base_url,
        store = %settings.storage().store_path.display(),
        environment = %settings.runtime().environment.as_str(),
        "EduConnect client starting"
    );

    let state = ClientState::from_settings(settings)?;
    match cli::execute(&state, cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<ApiError>() {
            Some(api_error) => {
                tracing::debug!(error = ?api_error, "Command failed");
                Err(anyhow::anyhow!(api_error.user_message()))
            }
            None => Err(err),
        },
    }
}
