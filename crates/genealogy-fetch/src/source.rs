//! Transport to the thesis search endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use genealogy_core::{Error, GenealogyConfig, Result};

/// Anything that can answer "theses where this identifier is among the directors".
#[async_trait]
pub trait ThesisSource: Send + Sync {
    /// Query theses directed by `person_id`.
    ///
    /// `count` asks the service for that many hits instead of its default page.
    async fn search_by_director(&self, person_id: &str, count: Option<u64>) -> Result<Value>;
}

#[async_trait]
impl<T: ThesisSource + ?Sized> ThesisSource for &T {
    async fn search_by_director(&self, person_id: &str, count: Option<u64>) -> Result<Value> {
        (**self).search_by_director(person_id, count).await
    }
}

#[async_trait]
impl<T: ThesisSource + ?Sized> ThesisSource for Box<T> {
    async fn search_by_director(&self, person_id: &str, count: Option<u64>) -> Result<Value> {
        (**self).search_by_director(person_id, count).await
    }
}

/// `ThesisSource` backed by the theses.fr JSON search API.
pub struct HttpThesisSource {
    client: Client,
    search_url: String,
}

impl HttpThesisSource {
    pub fn new(config: &GenealogyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, &config.search_url))
    }

    pub fn with_client(client: Client, search_url: &str) -> Self {
        Self {
            client,
            search_url: search_url.to_string(),
        }
    }
}

/// Query string for a director search.
pub fn director_query(person_id: &str) -> String {
    format!("directeursPpn:({})", person_id)
}

#[async_trait]
impl ThesisSource for HttpThesisSource {
    async fn search_by_director(&self, person_id: &str, count: Option<u64>) -> Result<Value> {
        let mut params = vec![("q", director_query(person_id))];
        if let Some(n) = count {
            params.push(("nombre", n.to_string()));
        }

        debug!("GET {} q={} nombre={:?}", self.search_url, params[0].1, count);

        let response = self
            .client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Body read error: {}", e)))?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_director_query() {
        assert_eq!(director_query("123456789"), "directeursPpn:(123456789)");
    }

    #[test]
    fn test_new_uses_configured_url() {
        let config = GenealogyConfig {
            search_url: "http://localhost:1/search".into(),
            ..GenealogyConfig::default()
        };
        let source = HttpThesisSource::new(&config).unwrap();
        assert_eq!(source.search_url, "http://localhost:1/search");
    }
}
