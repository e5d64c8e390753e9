use crate::config::FetchConfig;
use crate::error::PageError;
use crate::parsers::{self, Document};
use reqwest::{Client, StatusCode, header};
use std::time::Duration;
use url::Url;

/// Performs one timed GET per call and parses the body into a document.
///
/// The underlying client is reused across calls for connection pooling;
/// nothing else is carried between fetches.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: String,
}

impl Fetcher {
    /// Build a fetcher with the configured timeout and user agent
    pub fn new(config: &FetchConfig) -> Result<Self, PageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(PageError::Client)?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Fetch `url` and parse the response body.
    ///
    /// Single attempt: any transport failure, non-200 status or unreadable
    /// body is returned to the caller as-is.
    pub async fn fetch(&self, url: &Url) -> Result<Document, PageError> {
        ::log::debug!("GET {}", url);
        let started = std::time::Instant::now();

        let response = self
            .client
            .get(url.clone())
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|source| PageError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            ::log::warn!("{} answered with status {}", url, status.as_u16());
            return Err(PageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Consumes the response, releasing the connection on success and failure alike
        let body = response.text().await.map_err(|source| PageError::Parse {
            url: url.to_string(),
            source,
        })?;

        ::log::debug!(
            "Fetched {} ({} bytes) in {:.2} seconds",
            url,
            body.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(parsers::parse_document(&body))
    }
}
