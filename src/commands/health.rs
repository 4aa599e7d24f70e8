use anyhow::Result;

use crate::api::AssessmentApi;
use crate::config::Config;

/// Checks the root health endpoint, or the API one when `api` is set.
#[tracing::instrument(skip(config))]
pub async fn health(config: Config, api: bool) -> Result<()> {
    let client = config.lca_client();
    let status = if api {
        client.api_health().await?
    } else {
        client.health().await?
    };

    match status.version {
        Some(version) => println!("{} (version {}) at {}", status.status, version, status.timestamp),
        None => println!("{} at {}", status.status, status.timestamp),
    }
    Ok(())
}
