use std::time::Duration;

use crate::error::FeedError;
use crate::types::route::RouteFeed;

/// HTTP client for the remote route feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    url: String,
    client: reqwest::Client,
}

fn build_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    match builder.build() {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(
                "Failed to build feed client ({}), falling back to defaults without timeout {:?}",
                err,
                timeout
            );
            reqwest::Client::new()
        }
    }
}

impl FeedClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            url: url.into(),
            client: build_client(timeout),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<RouteFeed, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(RouteFeed::from_slice(&bytes)?)
    }

    /// Fetches the feed, logging and swallowing any failure. `None` is treated
    /// downstream exactly like a feed without destinations.
    pub async fn acquire(&self) -> Option<RouteFeed> {
        match self.fetch().await {
            Ok(feed) => {
                tracing::debug!(
                    "Fetched route feed from {} with {} destinations",
                    self.url,
                    feed.destinations.len()
                );
                Some(feed)
            }
            Err(err) => {
                tracing::warn!("Failed to find Santa!: {}", err);
                None
            }
        }
    }
}
