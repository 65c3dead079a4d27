//! HTTP client abstraction for testability

use std::time::Duration;

use super::RoutingError;

/// Trait for HTTP client operations.
///
/// Lets route sources be exercised against canned responses in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, RoutingError>;
}

/// Real HTTP client implementation using reqwest.
///
/// Blocking; call it from `spawn_blocking` inside async code.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RoutingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("waymark/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutingError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, RoutingError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| RoutingError::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RoutingError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| RoutingError::Http(format!("Failed to read response: {}", e)))
    }
}
