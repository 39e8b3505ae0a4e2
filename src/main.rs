use std::process::ExitCode;

use imgur_gallery_dl::{
    ConfigError, DEFAULT_CONFIG_FILE, GalleryDownloader, GalleryError, ImgurClient, ImgurError,
    Settings,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

const EXIT_CONFIG: u8 = 1;
const EXIT_AUTH: u8 = 2;
const EXIT_API: u8 = 3;
const EXIT_DESTINATION: u8 = 4;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let settings = match Settings::load(DEFAULT_CONFIG_FILE) {
        Ok(settings) => settings,
        Err(err) => {
            error!("{err}. Please verify the config file: {DEFAULT_CONFIG_FILE}");
            return ExitCode::from(config_exit_code(&err));
        }
    };

    let client = match ImgurClient::authenticate(&settings.client_id, &settings.client_secret).await
    {
        Ok(client) => client,
        Err(err) => {
            if err.is_auth() {
                error!(
                    "credentials were rejected: {err}. Please verify the config file: {DEFAULT_CONFIG_FILE}"
                );
            } else {
                error!("cannot reach the API: {err}");
            }
            return ExitCode::from(authenticate_exit_code(&err));
        }
    };

    match GalleryDownloader::new(client, settings).run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(run_exit_code(&err))
        }
    }
}

/// Exit status for an unusable settings file.
fn config_exit_code(_err: &ConfigError) -> u8 {
    EXIT_CONFIG
}

/// Exit status for a failed credential check.
fn authenticate_exit_code(err: &ImgurError) -> u8 {
    if err.is_auth() { EXIT_AUTH } else { EXIT_API }
}

/// Exit status for a gallery walk that could not complete.
fn run_exit_code(err: &GalleryError) -> u8 {
    match err {
        GalleryError::Listing(_) => EXIT_API,
        GalleryError::Destination { .. } => EXIT_DESTINATION,
    }
}
