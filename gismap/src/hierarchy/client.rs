use gismap_types::HierarchyResponse;
use log::{debug, info};

use crate::config::ViewerConfig;
use crate::error::GismapError;

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("gismap/", env!("CARGO_PKG_VERSION"));

/// HTTP client of the hierarchy endpoint.
#[derive(Debug, Clone)]
pub struct HierarchyClient {
    http_client: reqwest::Client,
    url: String,
}

impl HierarchyClient {
    /// Creates a client for the API configured in `config`.
    pub fn new(config: &ViewerConfig) -> Result<Self, GismapError> {
        Self::with_url(config.hierarchy_url())
    }

    /// Creates a client requesting the hierarchy from the given URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self, GismapError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.user_agent(USER_AGENT);

        Ok(Self {
            http_client: builder.build()?,
            url: url.into(),
        })
    }

    /// URL of the hierarchy document.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests and decodes the hierarchy document.
    pub async fn fetch(&self) -> Result<HierarchyResponse, GismapError> {
        debug!("Requesting hierarchy from {}", self.url);

        let response = self.http_client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            info!("Failed to load {}: {status}", self.url);
            return Err(GismapError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let hierarchy = parse_hierarchy(&bytes)?;
        info!(
            "Loaded hierarchy with {} states (API status: {})",
            hierarchy.hierarchy.len(),
            hierarchy.status
        );

        Ok(hierarchy)
    }
}

/// Decodes a hierarchy document.
pub fn parse_hierarchy(bytes: &[u8]) -> Result<HierarchyResponse, GismapError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::hierarchy::tests::{refused_url, CannedResponse, TestServer, DOCUMENT};

    #[test]
    fn client_uses_configured_url() {
        let config = ViewerConfig {
            api_base_url: "http://localhost:8000".into(),
            ..Default::default()
        };
        let client = HierarchyClient::new(&config).expect("failed to create client");
        assert_eq!(client.url(), "http://localhost:8000/api/hierarchy/");
    }

    #[test]
    fn parses_hierarchy_document() {
        let response = parse_hierarchy(DOCUMENT.as_bytes())
            .expect("failed to parse");

        assert!(response.is_success());
        assert_eq!(response.hierarchy.len(), 2);
        assert_eq!(response.hierarchy[0].cities[0].layers.len(), 2);
    }

    #[test]
    fn invalid_document_is_decoding_error() {
        assert_matches!(
            parse_hierarchy(b"<html>Bad gateway</html>"),
            Err(GismapError::Decoding(_))
        );
        assert_matches!(
            parse_hierarchy(br#"{"status": "success", "hierarchy": [{"state": 1}]}"#),
            Err(GismapError::Decoding(_))
        );
    }

    #[test]
    fn unreachable_server_is_http_error() {
        let client = HierarchyClient::with_url(refused_url()).expect("failed to create client");

        let result = tokio_test::block_on(client.fetch());
        assert_matches!(result, Err(GismapError::Http(_)));
    }

    #[test]
    fn fetches_served_document() {
        let server = TestServer::start(vec![CannedResponse::new(200, DOCUMENT)]);
        let client = HierarchyClient::with_url(server.url()).expect("failed to create client");

        let response = tokio_test::block_on(client.fetch()).expect("failed to fetch");
        assert!(response.is_success());
        assert_eq!(response.hierarchy.len(), 2);
    }

    #[test]
    fn server_error_status_is_reported() {
        let server = TestServer::start(vec![CannedResponse::new(
            500,
            r#"{"detail": "internal error"}"#,
        )]);
        let client = HierarchyClient::with_url(server.url()).expect("failed to create client");

        let result = tokio_test::block_on(client.fetch());
        assert_matches!(result, Err(GismapError::HttpStatus(500)));
    }

    #[test]
    fn error_page_with_success_status_is_decoding_error() {
        let server = TestServer::start(vec![CannedResponse::new(200, "<html>Bad gateway</html>")]);
        let client = HierarchyClient::with_url(server.url()).expect("failed to create client");

        let result = tokio_test::block_on(client.fetch());
        assert_matches!(result, Err(GismapError::Decoding(_)));
    }
}
