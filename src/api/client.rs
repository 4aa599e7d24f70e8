use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    API_HEALTH_PATH, ASSESS_PATH, AssessmentApi, HEALTH_PATH, HealthStatus,
    SUPPORTED_MATERIALS_PATH,
};
use crate::assessment::AssessmentRequest;
use crate::catalog::Catalog;
use crate::http::{ApiError, classify_response, classify_transport};

/// Where a catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    Fallback,
}

/// reqwest-backed client for the assessment backend.
#[derive(Clone)]
pub struct LcaClient {
    client: Client,
    base_url: String,
    fallback: Catalog,
}

impl LcaClient {
    #[tracing::instrument(skip(client, base_url, fallback))]
    pub fn new(client: Client, base_url: impl Into<String>, fallback: Catalog) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            fallback,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and return the JSON body. Single attempt.
    #[tracing::instrument(skip(self))]
    pub async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("GET {}...", url);
        self.execute(self.client.get(&url), path).await
    }

    /// POST `body` as JSON to `path` and return the JSON body. Single attempt.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: serde::Serialize + ?Sized + Sync,
    {
        let url = self.url(path);
        debug!("POST {}...", url);
        self.execute(self.client.post(&url).json(body), path).await
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|e| classify_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let err = classify_response(status, &body, path == ASSESS_PATH);
            debug!("{} failed: {}", path, err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse {
            status: status.as_u16(),
            message: format!("Failed to parse JSON response: {}", e),
        })
    }

    async fn get_typed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.get_json(path).await?;
        serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse {
            status: 200,
            message: format!("Unexpected response shape from {}: {}", path, e),
        })
    }

    /// Supported materials from the backend, or the built-in catalog when
    /// the endpoint fails for any reason.
    #[tracing::instrument(skip(self))]
    pub async fn supported_materials_or_fallback(&self) -> (Catalog, CatalogSource) {
        match self.supported_materials().await {
            Ok(catalog) => (catalog, CatalogSource::Remote),
            Err(e) => {
                warn!("Could not load supported materials ({}), using built-in catalog", e);
                (self.fallback.clone(), CatalogSource::Fallback)
            }
        }
    }
}

#[async_trait]
impl AssessmentApi for LcaClient {
    #[tracing::instrument(skip(self, request))]
    async fn assess(&self, request: &AssessmentRequest) -> Result<Value, ApiError> {
        self.post_json(ASSESS_PATH, request).await
    }

    #[tracing::instrument(skip(self))]
    async fn supported_materials(&self) -> Result<Catalog, ApiError> {
        self.get_typed(SUPPORTED_MATERIALS_PATH).await
    }

    #[tracing::instrument(skip(self))]
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_typed(HEALTH_PATH).await
    }

    #[tracing::instrument(skip(self))]
    async fn api_health(&self) -> Result<HealthStatus, ApiError> {
        self.get_typed(API_HEALTH_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{NETWORK_ERROR, RATE_LIMIT_EXCEEDED};
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(url: &str) -> LcaClient {
        LcaClient::new(Client::new(), url, Catalog::builtin())
    }

    #[tokio::test]
    async fn test_assess_posts_request_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/api/lca/assess")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "material": "Copper ore",
                "process": "Smelting",
                "location": "Chile"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": [], "metadata": {"request_id": "r1"}}"#)
            .create_async()
            .await;

        let mut request = AssessmentRequest::new("Copper ore", "Smelting");
        request.location = Some("Chile".to_string());

        let raw = client_for(&url).assess(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(raw["metadata"]["request_id"], "r1");
    }

    #[tokio::test]
    async fn test_assess_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/api/lca/assess")
            .with_status(429)
            .with_body(r#"{"message": "Too many requests"}"#)
            .create_async()
            .await;

        let err = client_for(&url)
            .assess(&AssessmentRequest::new("Bauxite", "Bayer process"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.code(), Some(RATE_LIMIT_EXCEEDED));
        assert!(err.to_string().contains("15 minutes"));
    }

    #[tokio::test]
    async fn test_assess_server_error_with_json_message() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("POST", "/api/lca/assess")
            .with_status(500)
            .with_body(r#"{"success": false, "message": "AI service unavailable", "code": "AI_DOWN"}"#)
            .create_async()
            .await;

        let err = client_for(&url)
            .assess(&AssessmentRequest::new("Bauxite", "Bayer process"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Http {
                status: 500,
                message: "AI service unavailable".to_string(),
                code: Some("AI_DOWN".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_assess_invalid_json_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("POST", "/api/lca/assess")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&url)
            .assess(&AssessmentRequest::new("Zinc ore", "Roasting"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponse { status: 200, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.health().await.unwrap_err();
        assert_eq!(err.status(), Some(0));
        assert_eq!(err.code(), Some(NETWORK_ERROR));
    }

    #[tokio::test]
    async fn test_supported_materials_remote() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/api/lca/supported-materials")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"materials": ["Copper ore"], "processes": ["Smelting"]}"#)
            .create_async()
            .await;

        let (catalog, source) = client_for(&url).supported_materials_or_fallback().await;

        mock.assert_async().await;
        assert_eq!(source, CatalogSource::Remote);
        assert_eq!(catalog.materials, vec!["Copper ore"]);
    }

    #[tokio::test]
    async fn test_supported_materials_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/api/lca/supported-materials")
            .with_status(503)
            .create_async()
            .await;

        let (catalog, source) = client_for(&url).supported_materials_or_fallback().await;

        assert_eq!(source, CatalogSource::Fallback);
        assert_eq!(catalog, Catalog::builtin());
    }

    #[tokio::test]
    async fn test_supported_materials_wrong_shape_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/api/lca/supported-materials")
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let (_, source) = client_for(&url).supported_materials_or_fallback().await;
        assert_eq!(source, CatalogSource::Fallback);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let root = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "ok", "timestamp": "2026-10-19T08:00:00Z", "version": "1.4.0"}"#)
            .create_async()
            .await;
        let api = server
            .mock("GET", "/api/lca/health")
            .with_status(200)
            .with_body(r#"{"status": "healthy", "timestamp": "2026-10-19T08:00:01Z"}"#)
            .create_async()
            .await;

        // Trailing slash on the base URL must not double up.
        let client = client_for(&format!("{}/", url));
        let health = client.health().await.unwrap();
        let api_health = client.api_health().await.unwrap();

        root.assert_async().await;
        api.assert_async().await;
        assert_eq!(health.version.as_deref(), Some("1.4.0"));
        assert_eq!(api_health.status, "healthy");
        assert_eq!(api_health.version, None);
    }

    #[tokio::test]
    async fn test_non_assess_429_is_plain_http_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/health")
            .with_status(429)
            .create_async()
            .await;

        let err = client_for(&url).health().await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 429, .. }));
        assert_eq!(err.message(), "HTTP error! status: 429");
    }
}
