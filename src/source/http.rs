//! HTTP fetcher for a JSON REST backend.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::Fetcher;

/// Fetches `GET <base_url><path>` where `{id}` in the path is replaced by
/// the URL-encoded entity id.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url_template: String,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, base_url: &str, path: &str) -> Self {
        Self {
            client,
            url_template: format!("{}{}", base_url.trim_end_matches('/'), path),
        }
    }

    pub fn url_for(&self, id: &str) -> String {
        self.url_template
            .replace("{id}", urlencoding::encode(id).as_ref())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, id: &str) -> anyhow::Result<Value> {
        let url = self.url_for(id);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", url))?;

        response
            .json::<Value>()
            .await
            .with_context(|| format!("{} returned invalid JSON", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_substitutes_id() {
        let fetcher = HttpFetcher::new(
            reqwest::Client::new(),
            "http://api.local/",
            "/users/{id}/plans",
        );
        assert_eq!(fetcher.url_for("42"), "http://api.local/users/42/plans");
    }

    #[test]
    fn test_url_for_encodes_id() {
        let fetcher = HttpFetcher::new(reqwest::Client::new(), "http://api.local", "/plans/{id}");
        assert_eq!(fetcher.url_for("a b/c"), "http://api.local/plans/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_backend_errors() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let fetcher = HttpFetcher::new(reqwest::Client::new(), "http://127.0.0.1:9", "/plans/{id}");
        let result = fetcher.fetch("1").await;
        assert!(result.is_err());
    }
}
