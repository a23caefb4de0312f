use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{ConfigError, SearchError};
use crate::extract::{extract_results, SearchResult};
use crate::query::BookRequest;

/// Builds the HTTP client shared by searches and downloads.
pub fn build_http_client(config: &Config) -> Result<Client, ConfigError> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout()? {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ConfigError::Client)
}

/// Posts book queries to an HTML search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: Url,
    user_agent: String,
    max_results: usize,
}

impl SearchClient {
    pub fn new(client: Client, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            client,
            endpoint: config.endpoint_url()?,
            user_agent: config.user_agent.clone(),
            max_results: config.max_results,
        })
    }

    /// Sends one search and returns the raw response body.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, query: &str) -> Result<String, SearchError> {
        let endpoint = self.endpoint.to_string();

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(USER_AGENT, &self.user_agent)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|source| SearchError::Network {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SearchError::Network { endpoint, source })?;
        debug!("Search response: {} bytes", body.len());
        Ok(body)
    }

    /// Searches for one book and extracts its result set.
    pub async fn search(&self, request: &BookRequest) -> Result<Vec<SearchResult>, SearchError> {
        let query = request.query();
        info!("Searching \"{}\" (topic: {})", query, request.topic);

        let page = self.fetch_page(&query).await?;
        let results = extract_results(&page, Some(&self.endpoint), self.max_results);

        info!("Found {} result(s) for \"{}\"", results.len(), request.book_name);
        Ok(results)
    }
}
