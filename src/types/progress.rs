use serde::{Deserialize, Serialize};

use crate::types::route::{Location, Waypoint};

/// How the current position is picked among delivered waypoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentSelection {
    /// Last delivered waypoint in feed order. Assumes the feed is chronological.
    #[default]
    FeedOrder,
    /// Delivered waypoint with the greatest arrival, later feed entries win ties.
    LatestArrival,
}

impl CurrentSelection {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "feed_order" | "feed-order" | "last" => Some(CurrentSelection::FeedOrder),
            "latest_arrival" | "latest-arrival" | "latest" => Some(CurrentSelection::LatestArrival),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentSelection::FeedOrder => "feed_order",
            CurrentSelection::LatestArrival => "latest_arrival",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NoProgress,
    EnRoute,
}

/// Result of resolving a feed against a reference time.
///
/// `delivered` is an order-preserving subsequence of `visited`, which is itself an
/// order-preserving subsequence of the feed's destinations. An empty `delivered`
/// means there is no current position yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteProgress {
    pub visited: Vec<Waypoint>,
    pub delivered: Vec<Waypoint>,
    pub(crate) current_index: Option<usize>,
}

impl RouteProgress {
    pub fn no_progress() -> Self {
        Self {
            visited: Vec::new(),
            delivered: Vec::new(),
            current_index: None,
        }
    }

    pub fn status(&self) -> ProgressStatus {
        if self.current_index.is_some() {
            ProgressStatus::EnRoute
        } else {
            ProgressStatus::NoProgress
        }
    }

    pub fn is_no_progress(&self) -> bool {
        self.status() == ProgressStatus::NoProgress
    }

    pub fn current(&self) -> Option<&Waypoint> {
        self.current_index.and_then(|idx| self.delivered.get(idx))
    }

    /// Delivered waypoints in feed order, the line drawn on the map.
    pub fn path(&self) -> &[Waypoint] {
        &self.delivered
    }

    pub fn path_locations(&self) -> Vec<Location> {
        self.delivered.iter().map(|w| w.location).collect()
    }
}
