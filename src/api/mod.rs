//! Assessment backend API.

mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assessment::AssessmentRequest;
use crate::catalog::Catalog;
use crate::http::ApiError;

pub use client::{CatalogSource, LcaClient};

pub const ASSESS_PATH: &str = "/api/lca/assess";
pub const SUPPORTED_MATERIALS_PATH: &str = "/api/lca/supported-materials";
pub const HEALTH_PATH: &str = "/health";
pub const API_HEALTH_PATH: &str = "/api/lca/health";

/// Body of the health endpoints.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Single-attempt operations against the backend. Retrying is left to the
/// caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    /// Submits an assessment and returns the raw, unnormalized payload.
    async fn assess(&self, request: &AssessmentRequest) -> Result<Value, ApiError>;
    async fn supported_materials(&self) -> Result<Catalog, ApiError>;
    async fn health(&self) -> Result<HealthStatus, ApiError>;
    async fn api_health(&self) -> Result<HealthStatus, ApiError>;
}
