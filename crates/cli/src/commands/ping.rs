//! Laundry API reachability check.

use freshwash_portal::api::ApiClient;
use freshwash_portal::config::ApiConfig;

use super::CommandError;

/// Send one request to the API base URL and report the status.
///
/// Any HTTP response counts as reachable; only transport failures error.
pub async fn run(api_url: Option<&str>) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let base_url = match api_url {
        Some(url) => url.to_string(),
        None => std::env::var("API_BASE_URL")
            .map_err(|_| CommandError::MissingEnvVar("API_BASE_URL"))?,
    };

    let config = ApiConfig::new(&base_url)?;
    let client = ApiClient::new(&config)?;

    tracing::info!("Pinging {}", config.base_url);
    let status = client.ping().await?;

    if status.is_server_error() {
        tracing::warn!(%status, "API answered with a server error");
    } else {
        tracing::info!(%status, "API reachable");
    }
    Ok(())
}
