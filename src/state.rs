use std::sync::Arc;

use crate::config::Config;
use crate::feed::FeedClient;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    feed: FeedClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let feed = FeedClient::new(config.feed_url.clone(), config.feed_timeout);
        Self {
            config: Arc::new(config),
            feed,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn feed(&self) -> &FeedClient {
        &self.feed
    }
}
