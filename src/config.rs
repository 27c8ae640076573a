use std::time::Duration;

use crate::types::map::{dimensions_within_limits, zoom_within_limits};
use crate::types::progress::CurrentSelection;
use crate::types::route::Location;

pub const DEFAULT_FEED_URL: &str = "https://firebasestorage.googleapis.com/v0/b/santa-tracker-firebase.appspot.com/o/route%2Fsanta_en.json?alt=media&2018b";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub feed_url: String,
    /// No timeout unless explicitly configured.
    pub feed_timeout: Option<Duration>,
    pub current_selection: CurrentSelection,
    pub map_center: Location,
    pub map_zoom: f64,
    pub map_width: u32,
    pub map_height: u32,
    pub fallback_location: Location,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_timeout: None,
            current_selection: CurrentSelection::FeedOrder,
            map_center: Location::new(38.9072, -77.0369),
            map_zoom: 1.0,
            map_width: 1024,
            map_height: 768,
            fallback_location: Location::new(0.0, 0.0),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env_parse("PORT").unwrap_or(defaults.port);

        let feed_url = std::env::var("FEED_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.feed_url);

        let feed_timeout = env_parse::<u64>("FEED_TIMEOUT_SECONDS").map(Duration::from_secs);

        let current_selection = std::env::var("CURRENT_SELECTION")
            .ok()
            .and_then(|s| CurrentSelection::from_str(&s))
            .unwrap_or(defaults.current_selection);

        let map_center = Location::new(
            env_parse("MAP_CENTER_LAT").unwrap_or(defaults.map_center.lat),
            env_parse("MAP_CENTER_LNG").unwrap_or(defaults.map_center.lng),
        );

        let fallback_location = Location::new(
            env_parse("FALLBACK_LAT").unwrap_or(defaults.fallback_location.lat),
            env_parse("FALLBACK_LNG").unwrap_or(defaults.fallback_location.lng),
        );

        Self {
            port,
            feed_url,
            feed_timeout,
            current_selection,
            map_center,
            map_zoom: env_parse("MAP_ZOOM").unwrap_or(defaults.map_zoom),
            map_width: env_parse("MAP_WIDTH").unwrap_or(defaults.map_width),
            map_height: env_parse("MAP_HEIGHT").unwrap_or(defaults.map_height),
            fallback_location,
        }
        .with_renderable_map()
    }

    /// Swaps a map size or zoom the renderer would reject for the defaults.
    pub fn with_renderable_map(mut self) -> Self {
        let defaults = Self::default();

        if !dimensions_within_limits(self.map_width, self.map_height) {
            tracing::warn!(
                "Ignoring MAP_WIDTH/MAP_HEIGHT {}x{}, using {}x{}",
                self.map_width,
                self.map_height,
                defaults.map_width,
                defaults.map_height
            );
            self.map_width = defaults.map_width;
            self.map_height = defaults.map_height;
        }

        if !zoom_within_limits(self.map_zoom) {
            tracing::warn!("Ignoring MAP_ZOOM {}, using {}", self.map_zoom, defaults.map_zoom);
            self.map_zoom = defaults.map_zoom;
        }

        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
