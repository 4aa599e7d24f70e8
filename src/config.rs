use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::api::LcaClient;
use crate::catalog::Catalog;
use crate::http::RetryPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Version string embedded by the build script.
pub const VERSION: &str = env!("LCA_CLIENT_VERSION");

/// User-supplied settings, typically from the command line or environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
    pub retry: Option<RetryPolicy>,
    pub catalog_path: Option<PathBuf>,
}

pub struct Config {
    pub client: Client,
    pub api_url: String,
    pub retry: RetryPolicy,
    pub catalog: Catalog,
}

impl Config {
    pub fn new(options: ConfigOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = options.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", key))
                .context("API key contains characters not allowed in a header")?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using API key for authentication: {}", mask(key));
        }

        let timeout = options
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let client = Client::builder()
            .user_agent(format!("lca-client/{}", VERSION))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let catalog = Catalog::resolve(options.catalog_path.as_deref())?;

        Ok(Self {
            client,
            api_url: options
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            retry: options.retry.unwrap_or_default(),
            catalog,
        })
    }

    pub fn lca_client(&self) -> LcaClient {
        LcaClient::new(self.client.clone(), &self.api_url, self.catalog.clone())
    }
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
